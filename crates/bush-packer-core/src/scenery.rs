// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::artifact::Build;
use crate::error::{BuildError, LoadError};
use crate::source::folder_id;
use std::path::{Path, PathBuf};

/// A scenery folder shipped next to the missions. Nothing is generated for it yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenery {
    id: String,
    src_dir: PathBuf,
}

impl Scenery {
    pub fn load(dir: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            id: folder_id(dir)?,
            src_dir: dir.to_path_buf(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }
}

impl Build for Scenery {
    fn build(&self, _out_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        log::debug!("[Scenery] {} has no build output", self.id);
        Ok(Vec::new())
    }
}
