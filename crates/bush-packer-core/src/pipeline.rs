// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::artifact::Build;
use crate::bush_pack::BushPack;
use crate::error::PackerError;
use crate::localization::LocalizationRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Loads the pack at `src_dir` and builds it into `dist_dir/<pack id>`.
///
/// Each run gets its own localization registry, so two runs never share strings.
pub fn run(src_dir: &Path, dist_dir: &Path) -> Result<Vec<PathBuf>, PackerError> {
    let registry = Arc::new(LocalizationRegistry::new());
    let pack = BushPack::load(src_dir, Arc::clone(&registry))?;
    log::info!(
        "Loaded pack {} v{}: {} missions, {} sceneries, {} strings",
        pack.id(),
        pack.version(),
        pack.missions().len(),
        pack.sceneries().len(),
        registry.len()
    );
    Ok(pack.build(dist_dir)?)
}
