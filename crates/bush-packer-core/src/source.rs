// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Helpers for reading the pack source tree.

use crate::error::LoadError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Image extensions tried in order; the first existing file wins.
pub const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// Reads and deserializes a `__*__.json` descriptor.
pub fn read_metadata<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    if !path.is_file() {
        return Err(LoadError::MissingMetadata(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| LoadError::MalformedMetadata {
        path: path.to_path_buf(),
        source,
    })
}

/// Name of the folder, as used for mission/pack/scenery ids.
///
/// The path is resolved first, so `.` or `../pack` name the folder they point at.
/// A path without a usable name (the filesystem root) is rejected.
pub fn folder_id(dir: &Path) -> Result<String, LoadError> {
    let resolved = dir.canonicalize().map_err(|e| LoadError::io(dir, e))?;
    match resolved.file_name().map(|name| name.to_string_lossy()) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(LoadError::UnnamedFolder(dir.to_path_buf())),
    }
}

/// `leg.3` → 2. Source folders count from 1, indices from 0.
pub fn parse_index(path: &Path, prefix: &'static str) -> Result<i32, LoadError> {
    let invalid = || LoadError::InvalidIndex {
        path: path.to_path_buf(),
        prefix,
    };
    let name = path.file_name().ok_or_else(invalid)?.to_string_lossy();
    let number = name
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('.'))
        .ok_or_else(invalid)?;
    match number.parse::<i32>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(invalid()),
    }
}

/// Entries of `dir` whose name starts with `prefix`, sorted by name.
/// A missing `dir` yields no entries.
pub fn list_entries(dir: &Path, prefix: &str, want_dirs: bool) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))? {
        let entry = entry.map_err(|e| LoadError::io(dir, e))?;
        let path = entry.path();
        if path.is_dir() != want_dirs {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with(prefix) {
            entries.push(path);
        }
    }
    entries.sort();
    Ok(entries)
}

/// Looks for `<stem>.jpg` then `<stem>.png` in `dir`.
pub fn find_image(dir: &Path, stem: &str) -> Option<PathBuf> {
    IMAGE_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", stem, ext)))
        .find(|candidate| candidate.is_file())
}
