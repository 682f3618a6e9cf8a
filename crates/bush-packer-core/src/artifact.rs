// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::error::BuildError;
use std::path::{Path, PathBuf};

/// The build half of the load/build contract shared by every entity of a pack.
///
/// `build` writes the entity's output below `out_dir` and returns the files it
/// produced. Directories never appear in the returned list.
pub trait Build {
    fn build(&self, out_dir: &Path) -> Result<Vec<PathBuf>, BuildError>;
}

/// Builds every child into `out_dir` and concatenates their artifacts.
pub(crate) fn build_all<'a, T, I>(children: I, out_dir: &Path) -> Result<Vec<PathBuf>, BuildError>
where
    T: Build + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut artifacts = Vec::new();
    for child in children {
        artifacts.extend(child.build(out_dir)?);
    }
    Ok(artifacts)
}

pub(crate) fn ensure_dir(dir: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))
}

/// Copies a required source file, failing with `MissingCompanion` when it is absent.
pub(crate) fn copy_file(src: &Path, dst: &Path) -> Result<PathBuf, BuildError> {
    if !src.is_file() {
        return Err(BuildError::MissingCompanion(src.to_path_buf()));
    }
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    log::debug!("Copying {:?} -> {:?}", src, dst);
    std::fs::copy(src, dst).map_err(|e| BuildError::io(dst, e))?;
    Ok(dst.to_path_buf())
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<PathBuf, BuildError> {
    std::fs::write(path, content).map_err(|e| BuildError::io(path, e))?;
    Ok(path.to_path_buf())
}

/// Fresh braced, upper-case GUID as the simulator expects in `InstanceId` attributes.
pub fn new_instance_id() -> String {
    format!("{{{}}}", uuid::Uuid::new_v4().hyphenated().to_string().to_uppercase())
}
