// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::artifact::{build_all, copy_file, new_instance_id, Build};
use crate::error::{BuildError, LoadError};
use crate::localization::{Alternatives, LocalizationRegistry, LocalizedString};
use crate::source::{find_image, list_entries, parse_index, read_metadata};
use crate::subleg;
use crate::template::{self, LEG_END_TRIGGER_XML};
use crate::waypoint::Waypoint;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const METADATA_FILE: &str = "__leg__.json";

/// Index carried by a mission's seed leg.
pub const INITIAL_LEG_INDEX: i32 = -1;

#[derive(Debug, Deserialize)]
struct LegMetadata {
    description: Alternatives,
}

/// One flight of a bush trip: the chain of waypoints flown before landing.
#[derive(Debug, Clone)]
pub struct Leg {
    mission_id: String,
    index: i32,
    description: Option<Arc<LocalizedString>>,
    waypoints: Vec<Waypoint>,
    trigger_id: Option<String>,
    briefing_image: Option<PathBuf>,
}

impl Leg {
    /// Seed leg holding only the mission's start fix. It exists so the first real
    /// leg has a predecessor to chain from; it is never built nor listed.
    pub fn initial(mission_id: impl Into<String>, start_fix: impl Into<String>) -> Self {
        Self {
            mission_id: mission_id.into(),
            index: INITIAL_LEG_INDEX,
            description: None,
            waypoints: vec![Waypoint::start_fix(start_fix)],
            trigger_id: None,
            briefing_image: None,
        }
    }

    /// Loads a `leg.N` folder. Waypoints come from `waypoint.*` folders and legacy
    /// `subleg.*` files, ordered by their own index.
    pub fn load(dir: &Path, mission_id: &str, registry: &LocalizationRegistry) -> Result<Self, LoadError> {
        let index = parse_index(dir, "leg")?;
        let metadata: LegMetadata = read_metadata(&dir.join(METADATA_FILE))?;
        let description = registry.intern(
            format!("BUSH_PACK.{}.LEG{}.DESCRIPTION", mission_id, index + 1),
            metadata.description,
        );

        let mut waypoints = Vec::new();
        for wpt_dir in list_entries(dir, "waypoint.", true)? {
            waypoints.push(Waypoint::load(&wpt_dir, mission_id, index, registry)?);
        }
        for file in list_entries(dir, "subleg.", false)? {
            waypoints.push(subleg::load(&file, mission_id, index, registry)?);
        }
        waypoints.sort_by_key(Waypoint::position);
        if let Some(pair) = waypoints
            .windows(2)
            .find(|pair| pair[0].position() == pair[1].position())
        {
            return Err(LoadError::DuplicateIndex {
                path: dir.to_path_buf(),
                kind: "waypoint",
                index: pair[1].position() + 1,
            });
        }

        log::debug!(
            "[Leg] Loaded {} leg {} with {} waypoints",
            mission_id,
            index + 1,
            waypoints.len()
        );

        Ok(Self {
            mission_id: mission_id.to_string(),
            index,
            description: Some(description),
            waypoints,
            trigger_id: Some(new_instance_id()),
            briefing_image: find_image(dir, "briefing"),
        })
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    pub fn is_initial(&self) -> bool {
        self.index == INITIAL_LEG_INDEX
    }

    pub fn description(&self) -> Option<&LocalizedString> {
        self.description.as_deref()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn last_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Id of the landing trigger that completes this leg. The seed leg has none.
    pub fn trigger_id(&self) -> Option<&str> {
        self.trigger_id.as_deref()
    }

    fn briefing_output_rel_path(&self) -> Option<String> {
        let src = self.briefing_image.as_ref()?;
        let name = src.file_name()?.to_string_lossy();
        Some(format!("images/{}_{}", self.index + 1, name))
    }

    /// The `<Leg>` element. Waypoint i is chained from waypoint i-1, the first one
    /// from `chain_start`: the last waypoint flown before this leg, which the
    /// mission picks (the start fix for the first leg).
    pub fn render(&self, chain_start: &Waypoint) -> String {
        let descr = self
            .description
            .as_ref()
            .map(|d| d.render_default())
            .unwrap_or_default();
        let trigger_ref = self
            .trigger_id
            .as_ref()
            .map(|id| format!("\n<AirportLandingTriggerEnd UniqueRefId=\"{}\" />", id))
            .unwrap_or_default();
        format!(
            "<Leg>\n<Descr>{}</Descr>{}\n<SubLegs>\n{}\n</SubLegs>\n</Leg>",
            descr,
            trigger_ref,
            self.render_waypoints(chain_start)
        )
    }

    fn render_waypoints(&self, chain_start: &Waypoint) -> String {
        std::iter::once(chain_start)
            .chain(self.waypoints.iter())
            .zip(self.waypoints.iter())
            .map(|(prev, wpt)| wpt.render(prev))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The airport calculator that fires when the aircraft has landed at the leg's
    /// last waypoint. Both ids are shared by every leg of the mission.
    pub fn render_completion_trigger(
        &self,
        out_of_runway_id: &str,
        landing_rest_id: &str,
    ) -> Result<String, BuildError> {
        let Some(trigger_id) = self.trigger_id.as_deref() else {
            return Ok(String::new());
        };
        let last = self.last_waypoint().ok_or_else(|| BuildError::EmptyLeg {
            mission: self.mission_id.clone(),
            leg: self.index + 1,
        })?;
        template::render(
            LEG_END_TRIGGER_XML,
            &[
                ("end_trigger_uuid", trigger_id),
                ("last_wpt_id", last.ident()),
                ("event_trigger_out_of_rwy_uuid", out_of_runway_id),
                ("flow_event_landing_rest_uuid", landing_rest_id),
            ],
        )
        .map_err(|e| BuildError::template("leg_end_trigger.xml_template", e))
    }

    /// Line for the mission `.flt` pointing at this leg's briefing image.
    pub fn render_flt_briefing_image(&self) -> Option<String> {
        self.briefing_output_rel_path()
            .map(|rel| format!("BriefingImage.{}={}", self.index + 1, rel))
    }
}

impl Build for Leg {
    fn build(&self, out_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let mut artifacts = build_all(&self.waypoints, out_dir)?;
        if let (Some(src), Some(rel)) = (&self.briefing_image, self.briefing_output_rel_path()) {
            artifacts.push(copy_file(src, &out_dir.join(rel))?);
        }
        artifacts.sort();
        Ok(artifacts)
    }
}
