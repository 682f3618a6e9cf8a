// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::artifact::{build_all, ensure_dir, Build};
use crate::error::{BuildError, LoadError};
use crate::layout::Layout;
use crate::localization::{Alternatives, LocalizationRegistry, LocalizedString};
use crate::mission::Mission;
use crate::scenery::Scenery;
use crate::source::{folder_id, list_entries, read_metadata};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const METADATA_FILE: &str = "__bush_pack__.json";
pub const MISSIONS_DIR: &str = "Missions";
pub const SCENERIES_DIR: &str = "Sceneries";

#[derive(Debug, Deserialize)]
struct BushPackMetadata {
    version: String,
    title: Alternatives,
}

/// Content of a `{language}.locPak` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocPak {
    #[serde(rename = "LocalisationPackage")]
    pub package: LocalisationPackage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalisationPackage {
    #[serde(rename = "Language")]
    pub language: String,
    #[serde(rename = "Strings")]
    pub strings: BTreeMap<String, String>,
}

/// Root of the content tree. It keeps a handle on the registry its strings were
/// interned into, so building can emit the localization packs.
#[derive(Debug, Clone)]
pub struct BushPack {
    id: String,
    version: String,
    title: Arc<LocalizedString>,
    missions: Vec<Mission>,
    sceneries: Vec<Scenery>,
    registry: Arc<LocalizationRegistry>,
}

impl BushPack {
    /// Loads the whole pack. Missions are loaded in parallel and kept in folder-name order.
    pub fn load(dir: &Path, registry: Arc<LocalizationRegistry>) -> Result<Self, LoadError> {
        let metadata: BushPackMetadata = read_metadata(&dir.join(METADATA_FILE))?;
        let id = folder_id(dir)?;
        let title = registry.intern("BUSH_PACK.TITLE", metadata.title);

        let missions = list_entries(&dir.join(MISSIONS_DIR), "", true)?
            .par_iter()
            .map(|mission_dir| Mission::load(mission_dir, &registry))
            .collect::<Result<Vec<_>, _>>()?;
        let sceneries = list_entries(&dir.join(SCENERIES_DIR), "", true)?
            .iter()
            .map(|scenery_dir| Scenery::load(scenery_dir))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id,
            version: metadata.version,
            title,
            missions,
            sceneries,
            registry,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn title(&self) -> &LocalizedString {
        &self.title
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn sceneries(&self) -> &[Scenery] {
        &self.sceneries
    }

    pub fn registry(&self) -> &LocalizationRegistry {
        &self.registry
    }

    fn build_loc_paks(&self, root: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let mut written = Vec::new();
        for (language, strings) in self.registry.dump_all() {
            let path = root.join(format!("{}.locPak", language));
            let pak = LocPak {
                package: LocalisationPackage { language, strings },
            };
            let json = serde_json::to_string_pretty(&pak).map_err(|source| BuildError::Json {
                path: path.clone(),
                source,
            })?;
            std::fs::write(&path, json).map_err(|e| BuildError::io(&path, e))?;
            log::debug!("[BushPack] Wrote {:?}", path);
            written.push(path);
        }
        Ok(written)
    }
}

impl Build for BushPack {
    /// Builds the pack into `{out_dir}/{id}`, replacing whatever was there.
    ///
    /// Returns every file written, `layout.json` included, sorted.
    fn build(&self, out_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let root = out_dir.join(&self.id);
        if root.exists() {
            log::info!("[BushPack] Removing previous build at {:?}", root);
            std::fs::remove_dir_all(&root).map_err(|e| BuildError::io(&root, e))?;
        }
        ensure_dir(&root)?;

        let mut artifacts = build_all(&self.missions, &root.join(MISSIONS_DIR))?;
        artifacts.extend(build_all(&self.sceneries, &root.join(SCENERIES_DIR))?);
        artifacts.extend(self.build_loc_paks(&root)?);
        artifacts.sort();

        let layout = Layout::from_artifacts(&root, &artifacts)?;
        artifacts.push(layout.write(&root)?);
        artifacts.sort();

        log::info!(
            "[BushPack] Built {} ({} files) into {:?}",
            self.id,
            artifacts.len(),
            root
        );
        Ok(artifacts)
    }
}
