// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! `layout.json`: the file index the simulator package loader reads.

use crate::error::BuildError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LAYOUT_FILE: &str = "layout.json";

/// 100 ns ticks between 1601-01-01 (Windows FILETIME epoch) and 1970-01-01.
pub const WINDOWS_EPOCH_OFFSET: i64 = 116_444_736_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub path: String,
    pub size: u64,
    pub date: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub content: Vec<LayoutEntry>,
}

/// Modification time as a FILETIME tick count.
pub fn filetime_ticks(mtime: DateTime<Utc>) -> i64 {
    let ticks = mtime.timestamp() * 10_000_000 + i64::from(mtime.timestamp_subsec_nanos() / 100);
    WINDOWS_EPOCH_OFFSET + ticks
}

impl LayoutEntry {
    /// Describes `artifact`, which must be a regular file under `root`.
    pub fn from_artifact(root: &Path, artifact: &Path) -> Result<Self, BuildError> {
        let metadata = std::fs::symlink_metadata(artifact).map_err(|e| BuildError::io(artifact, e))?;
        if !metadata.is_file() {
            return Err(BuildError::NotAFile(artifact.to_path_buf()));
        }
        let mtime: DateTime<Utc> = metadata
            .modified()
            .map_err(|e| BuildError::io(artifact, e))?
            .into();
        let rel = artifact.strip_prefix(root).unwrap_or(artifact);
        let path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        Ok(Self {
            path,
            size: metadata.len(),
            date: filetime_ticks(mtime),
        })
    }
}

impl Layout {
    pub fn from_artifacts(root: &Path, artifacts: &[PathBuf]) -> Result<Self, BuildError> {
        let mut content = artifacts
            .iter()
            .map(|artifact| LayoutEntry::from_artifact(root, artifact))
            .collect::<Result<Vec<_>, _>>()?;
        content.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(Self { content })
    }

    /// Writes `layout.json` into `root` and returns its path.
    pub fn write(&self, root: &Path) -> Result<PathBuf, BuildError> {
        let path = root.join(LAYOUT_FILE);
        let json = serde_json::to_string_pretty(self).map_err(|source| BuildError::Json {
            path: path.clone(),
            source,
        })?;
        std::fs::write(&path, json).map_err(|e| BuildError::io(&path, e))?;
        Ok(path)
    }
}
