// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::artifact::{copy_file, Build};
use crate::error::{BuildError, LoadError};
use crate::localization::{read_language_files, LanguageFile, LocalizationRegistry, LocalizedString};
use crate::source::{find_image, parse_index, read_metadata};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const METADATA_FILE: &str = "__waypoint__.json";

/// How the simulator resolves the fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaypointKind {
    /// A real-world fix known to the navigation database.
    Icao,
    /// An author-defined fix; the simulator wants a synthetic region code for it.
    User,
}

impl WaypointKind {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "ICAO" => Some(WaypointKind::Icao),
            "user" => Some(WaypointKind::User),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaypointMetadata {
    #[serde(rename = "type")]
    kind: String,
    ident: String,
}

#[derive(Debug, Clone)]
pub struct Waypoint {
    kind: WaypointKind,
    leg_index: i32,
    position: i32,
    ident: String,
    description: Option<Arc<LocalizedString>>,
    image_src: Option<PathBuf>,
}

/// `BUSH_PACK.{mission}.WPT{leg}x{pos:02}.DESCRIPTION`, both counters 1-based.
pub fn description_id(mission_id: &str, leg_index: i32, position: i32) -> String {
    format!(
        "BUSH_PACK.{}.WPT{}x{:02}.DESCRIPTION",
        mission_id,
        leg_index + 1,
        position + 1
    )
}

impl Waypoint {
    pub(crate) fn new(
        kind: WaypointKind,
        leg_index: i32,
        position: i32,
        ident: String,
        description: Option<Arc<LocalizedString>>,
        image_src: Option<PathBuf>,
        origin: &Path,
    ) -> Result<Self, LoadError> {
        if kind == WaypointKind::User && !(0..26).contains(&leg_index) {
            return Err(LoadError::RegionOutOfRange {
                path: origin.to_path_buf(),
                ident,
                leg: leg_index + 1,
            });
        }
        Ok(Self {
            kind,
            leg_index,
            position,
            ident,
            description,
            image_src,
        })
    }

    /// The lone waypoint of a mission's seed leg: the fix the flight starts from.
    pub fn start_fix(ident: impl Into<String>) -> Self {
        Self {
            kind: WaypointKind::Icao,
            leg_index: -1,
            position: -1,
            ident: ident.into(),
            description: None,
            image_src: None,
        }
    }

    /// Loads a `waypoint.N` folder of the leg with index `leg_index`.
    pub fn load(
        dir: &Path,
        mission_id: &str,
        leg_index: i32,
        registry: &LocalizationRegistry,
    ) -> Result<Self, LoadError> {
        let position = parse_index(dir, "waypoint")?;
        let metadata_path = dir.join(METADATA_FILE);
        let metadata: WaypointMetadata = read_metadata(&metadata_path)?;
        let kind = WaypointKind::parse(&metadata.kind).ok_or_else(|| {
            LoadError::InvalidWaypointType {
                path: metadata_path.clone(),
                value: metadata.kind.clone(),
            }
        })?;

        // Interned even without texts so the sub-leg always carries its token
        let alternatives = read_language_files(dir, LanguageFile::Description)?;
        let description = registry.intern(
            description_id(mission_id, leg_index, position),
            alternatives,
        );

        Self::new(
            kind,
            leg_index,
            position,
            metadata.ident,
            Some(description),
            find_image(dir, "image"),
            dir,
        )
    }

    pub fn kind(&self) -> WaypointKind {
        self.kind
    }

    pub fn leg_index(&self) -> i32 {
        self.leg_index
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn description(&self) -> Option<&LocalizedString> {
        self.description.as_deref()
    }

    pub fn image_src(&self) -> Option<&Path> {
        self.image_src.as_deref()
    }

    /// `!A` for user fixes of the first leg, `!B` for the second, and so on.
    pub fn region_code(&self) -> Option<String> {
        match self.kind {
            WaypointKind::Icao => None,
            WaypointKind::User => {
                let letter = (b'A' + self.leg_index as u8) as char;
                Some(format!("!{}", letter))
            }
        }
    }

    fn marker(&self, element: &str) -> String {
        match self.region_code() {
            None => format!("<{} id=\"{}\" />", element, self.ident),
            Some(region) => format!(
                "<{element} id=\"{}\">\n  <idRegion>{}</idRegion>\n</{element}>",
                self.ident,
                region,
                element = element
            ),
        }
    }

    pub fn start_marker(&self) -> String {
        self.marker("ATCWaypointStart")
    }

    pub fn end_marker(&self) -> String {
        self.marker("ATCWaypointEnd")
    }

    /// Where the briefing image lands, relative to the mission output folder.
    pub fn image_output_rel_path(&self) -> Option<String> {
        let src = self.image_src.as_ref()?;
        let ext = src
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        Some(format!(
            "images/{}x{:02}_{}{}",
            self.leg_index + 1,
            self.position + 1,
            self.ident,
            ext
        ))
    }

    /// The sub-leg arriving at this waypoint, starting from `previous`.
    pub fn render(&self, previous: &Waypoint) -> String {
        let descr = self
            .description
            .as_ref()
            .map(|d| d.render_default())
            .unwrap_or_default();
        let image = self
            .image_output_rel_path()
            .map(|p| format!("\n<ImagePath>{}</ImagePath>", p))
            .unwrap_or_default();
        format!(
            "<SubLeg>\n<Descr>{}</Descr>{}\n{}\n{}\n</SubLeg>",
            descr,
            image,
            previous.start_marker(),
            self.end_marker()
        )
    }
}

impl Build for Waypoint {
    fn build(&self, out_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        match (&self.image_src, self.image_output_rel_path()) {
            (Some(src), Some(rel)) => Ok(vec![copy_file(src, &out_dir.join(rel))?]),
            _ => Ok(Vec::new()),
        }
    }
}
