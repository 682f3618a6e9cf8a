// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::artifact::{build_all, copy_file, ensure_dir, new_instance_id, write_file, Build};
use crate::error::{BuildError, LoadError};
use crate::leg::Leg;
use crate::localization::{
    read_language_files, Alternatives, LanguageFile, LocalizationRegistry, LocalizedString,
};
use crate::source::{folder_id, list_entries, read_metadata};
use crate::template::{self, MISSION_XML};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

pub const METADATA_FILE: &str = "__mission__.json";
pub const FLIGHT_PLAN_FILE: &str = "flight_plan.pln";
pub const WEATHER_FILE: &str = "weather.wpr";
pub const FLT_FILE: &str = "mission.flt";
pub const FLT_TEMPLATE_FILE: &str = "mission.flt_template";
pub const IMAGES_DIR: &str = "images";

#[derive(Debug, Deserialize)]
struct MissionMetadata {
    version: String,
    title: Alternatives,
    description: Alternatives,
    #[serde(default)]
    location: Option<Alternatives>,
    initial_fix: String,
}

#[derive(Debug, Clone)]
pub struct Mission {
    id: String,
    uuid: String,
    version: String,
    title: Arc<LocalizedString>,
    description: Arc<LocalizedString>,
    location: Option<Arc<LocalizedString>>,
    briefing: Arc<LocalizedString>,
    initial_leg: Leg,
    legs: Vec<Leg>,
    src_dir: PathBuf,
}

impl Mission {
    pub fn load(dir: &Path, registry: &LocalizationRegistry) -> Result<Self, LoadError> {
        let id = folder_id(dir)?;
        let metadata: MissionMetadata = read_metadata(&dir.join(METADATA_FILE))?;

        let title = registry.intern(format!("BUSH_PACK.{}.TITLE", id), metadata.title);
        let description =
            registry.intern(format!("BUSH_PACK.{}.DESCRIPTION", id), metadata.description);
        let location = metadata
            .location
            .map(|alts| registry.intern(format!("BUSH_PACK.{}.LOCATION", id), alts));

        let briefing_alternatives = read_language_files(dir, LanguageFile::Briefing)?;
        let briefing = registry.intern(format!("BUSH_PACK.{}.BRIEFING", id), briefing_alternatives);

        let mut legs = Vec::new();
        for leg_dir in list_entries(dir, "leg.", true)? {
            legs.push(Leg::load(&leg_dir, &id, registry)?);
        }
        legs.sort_by_key(Leg::index);
        if let Some(pair) = legs.windows(2).find(|pair| pair[0].index() == pair[1].index()) {
            return Err(LoadError::DuplicateIndex {
                path: dir.to_path_buf(),
                kind: "leg",
                index: pair[1].index() + 1,
            });
        }

        log::info!("[Mission] Loaded {} ({} legs)", id, legs.len());

        Ok(Self {
            initial_leg: Leg::initial(id.clone(), metadata.initial_fix),
            uuid: new_instance_id(),
            version: metadata.version,
            id,
            title,
            description,
            location,
            briefing,
            legs,
            src_dir: dir.to_path_buf(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn title(&self) -> &LocalizedString {
        &self.title
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn initial_leg(&self) -> &Leg {
        &self.initial_leg
    }

    fn render_legs(&self) -> String {
        // The seed leg always holds the start fix
        let Some(mut anchor) = self.initial_leg.last_waypoint() else {
            return String::new();
        };
        let mut rendered = Vec::with_capacity(self.legs.len());
        for leg in &self.legs {
            rendered.push(leg.render(anchor));
            // Empty legs are skipped as anchors so the sub-leg graph stays contiguous
            if let Some(last) = leg.last_waypoint() {
                anchor = last;
            }
        }
        rendered.join("\n")
    }

    fn render_completion_triggers(
        &self,
        out_of_runway_id: &str,
        landing_rest_id: &str,
    ) -> Result<String, BuildError> {
        let triggers = self
            .legs
            .iter()
            .map(|leg| leg.render_completion_trigger(out_of_runway_id, landing_rest_id))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(triggers.join("\n"))
    }

    /// The mission definition document. Every object id except the mission's own
    /// uuid and the legs' trigger ids is generated fresh on each call.
    pub fn render(&self) -> Result<String, BuildError> {
        let out_of_runway_id = new_instance_id();
        let landing_rest_id = new_instance_id();

        let title = self.title.render_default();
        let description = self.description.render_default();
        let legs = self.render_legs();
        let triggers = self.render_completion_triggers(&out_of_runway_id, &landing_rest_id)?;

        let fresh: Vec<(&str, String)> = [
            "calc_out_of_fuel_uuid",
            "flight_uuid",
            "flow_event_disable_fuel_uuid",
            "flow_state_intro_uuid",
            "flow_state_bush_trip_uuid",
            "flow_state_landing_rest_uuid",
            "goal_uuid",
            "goal_resolution_success_uuid",
            "goal_resolution_failure_uuid",
            "rtc_ground_ac_outro_uuid",
            "teleport_wise_rtc_uuid",
            "teleport_wise_rtc_non_rtc_uuid",
            "teleport_ground_arpt_ac_intro_uuid",
            "timer_start_uuid",
            "wise_afs_set_uuid",
        ]
        .into_iter()
        .map(|name| (name, new_instance_id()))
        .collect();

        let mut values: Vec<(&str, &str)> = vec![
            ("title", title.as_str()),
            ("mission_id", self.id.as_str()),
            ("description", description.as_str()),
            ("legs", legs.as_str()),
            ("leg_completion_triggers", triggers.as_str()),
            ("mission_uuid", self.uuid.as_str()),
            ("event_trigger_out_of_rwy_uuid", out_of_runway_id.as_str()),
            ("flow_event_landing_rest_uuid", landing_rest_id.as_str()),
        ];
        values.extend(fresh.iter().map(|(name, id)| (*name, id.as_str())));

        template::render(MISSION_XML, &values)
            .map_err(|e| BuildError::template("mission.xml_template", e))
    }

    /// Fills the author's `mission.flt_template`.
    pub fn render_flt(&self) -> Result<String, BuildError> {
        let path = self.src_dir.join(FLT_TEMPLATE_FILE);
        let text = std::fs::read_to_string(&path).map_err(|e| BuildError::io(&path, e))?;

        let location = self
            .location
            .as_ref()
            .map(|l| l.render_default())
            .unwrap_or_default();
        let briefing = self.briefing.render_default();
        let title = self.title.render_default();
        let description = self.description.render_default();
        let images = self
            .legs
            .iter()
            .filter_map(Leg::render_flt_briefing_image)
            .collect::<Vec<_>>()
            .join("\n");

        template::render(
            &text,
            &[
                ("location", location.as_str()),
                ("title", title.as_str()),
                ("description", description.as_str()),
                ("main_briefing", briefing.as_str()),
                ("leg_briefing_images", images.as_str()),
                ("mission_id", self.id.as_str()),
            ],
        )
        .map_err(|e| BuildError::template(path.to_string_lossy(), e))
    }

    fn build_flt(&self, dst: &Path) -> Result<PathBuf, BuildError> {
        if self.src_dir.join(FLT_TEMPLATE_FILE).is_file() {
            write_file(dst, &self.render_flt()?)
        } else {
            copy_file(&self.src_dir.join(FLT_FILE), dst)
        }
    }

    fn copy_images(&self, root: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let src = self.src_dir.join(IMAGES_DIR);
        if !src.is_dir() {
            return Ok(Vec::new());
        }
        let mut copied = Vec::new();
        for entry in WalkDir::new(&src).min_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&src).to_path_buf();
                BuildError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(&src).unwrap_or(entry.path());
            copied.push(copy_file(entry.path(), &root.join(IMAGES_DIR).join(rel))?);
        }
        Ok(copied)
    }
}

impl Build for Mission {
    fn build(&self, out_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let root = out_dir.join(&self.id);
        ensure_dir(&root.join(IMAGES_DIR))?;
        log::info!("[Mission] Building {} into {:?}", self.id, root);

        let mut artifacts = build_all(&self.legs, &root)?;
        artifacts.push(copy_file(
            &self.src_dir.join(FLIGHT_PLAN_FILE),
            &root.join(format!("{}.pln", self.id)),
        )?);
        artifacts.push(copy_file(
            &self.src_dir.join(WEATHER_FILE),
            &root.join(WEATHER_FILE),
        )?);
        artifacts.extend(self.copy_images(&root)?);
        artifacts.push(self.build_flt(&root.join(format!("{}.flt", self.id)))?);
        artifacts.push(write_file(
            &root.join(format!("{}.xml", self.id)),
            &self.render()?,
        )?);

        artifacts.sort();
        artifacts.dedup();
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn make_mission(root: &Path, legs: &[&[(&str, &str)]]) -> PathBuf {
        let dir = root.join("M1");
        write(
            &dir.join(METADATA_FILE),
            r#"{"version": "1.0.0", "title": {"en-US": "Trip"},
                "description": {"en-US": "Desc"}, "initial_fix": "PAJN"}"#,
        );
        for (l, waypoints) in legs.iter().enumerate() {
            let leg_dir = dir.join(format!("leg.{}", l + 1));
            write(
                &leg_dir.join("__leg__.json"),
                r#"{"description": {"en-US": "Leg"}}"#,
            );
            for (w, (kind, ident)) in waypoints.iter().enumerate() {
                write(
                    &leg_dir.join(format!("waypoint.{}/__waypoint__.json", w + 1)),
                    &format!(r#"{{"type": "{}", "ident": "{}"}}"#, kind, ident),
                );
            }
        }
        dir
    }

    #[test]
    fn test_legs_ordered_by_index() {
        let root = tempdir().unwrap();
        let one: &[(&str, &str)] = &[("ICAO", "A")];
        let dir = make_mission(root.path(), &[one; 11]);
        let mission = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        let indices: Vec<_> = mission.legs().iter().map(Leg::index).collect();
        assert_eq!(indices, (0..11).collect::<Vec<_>>());
    }

    #[test]
    fn test_render_chains_across_legs() {
        let root = tempdir().unwrap();
        let dir = make_mission(root.path(), &[&[("ICAO", "ABCD")], &[("user", "USR1")]]);
        let mission = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        let xml = mission.render().unwrap();

        let first = xml.find("<ATCWaypointStart id=\"PAJN\" />").unwrap();
        let abcd_end = xml.find("<ATCWaypointEnd id=\"ABCD\" />").unwrap();
        let abcd_start = xml.find("<ATCWaypointStart id=\"ABCD\" />").unwrap();
        let usr_end = xml.find("<ATCWaypointEnd id=\"USR1\">").unwrap();
        assert!(first < abcd_end && abcd_end < abcd_start && abcd_start < usr_end);
        assert!(xml.contains("<idRegion>!B</idRegion>"));
    }

    #[test]
    fn test_render_ids_appear_once_plus_references() {
        let root = tempdir().unwrap();
        let dir = make_mission(root.path(), &[&[("ICAO", "AAAA")], &[("ICAO", "BBBB")]]);
        let mission = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        let xml = mission.render().unwrap();

        assert_eq!(xml.matches(mission.uuid()).count(), 1);
        for leg in mission.legs() {
            let trigger = leg.trigger_id().unwrap();
            assert_eq!(xml.matches(&format!("InstanceId=\"{}\"", trigger)).count(), 1);
            assert_eq!(xml.matches(&format!("UniqueRefId=\"{}\"", trigger)).count(), 1);
        }

        // The shared ids: one definition, one reference per leg trigger
        let defs = |marker: &str| -> String {
            let start = xml.find(marker).unwrap() + marker.len();
            let id_start = xml[start..].find("InstanceId=\"").unwrap() + start + 12;
            xml[id_start..id_start + 38].to_string()
        };
        let out_of_rwy = defs("<SimMission.EventTriggerAction id=\"ACT_NotifOutOfRunway\"");
        assert_eq!(xml.matches(&out_of_rwy).count(), 1 + mission.legs().len());
        assert_eq!(
            xml.matches(&format!("EventTriggerAction id=\"ACT_NotifOutOfRunway\" InstanceId=\"{}\"", out_of_rwy))
                .count(),
            1
        );

        let landing_rest = defs("<WorldBase.ObjectReference id=\"FlowEvent_LandingRest\"");
        assert_eq!(xml.matches(&landing_rest).count(), 1 + mission.legs().len());
        assert_eq!(
            xml.matches(&format!("<SimMission.FlowEventAction InstanceId=\"{}\"", landing_rest))
                .count(),
            1
        );
        assert_eq!(
            xml.matches(&format!("id=\"FlowEvent_LandingRest\" InstanceId=\"{}\"", landing_rest))
                .count(),
            mission.legs().len()
        );
        assert_ne!(landing_rest, out_of_rwy);
    }

    #[test]
    fn test_empty_leg_keeps_chain_contiguous() {
        let root = tempdir().unwrap();
        let dir = make_mission(
            root.path(),
            &[&[("ICAO", "AAAA")], &[], &[("ICAO", "CCCC")]],
        );
        let mission = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        let xml = mission.render_legs();
        assert!(xml.contains("<ATCWaypointStart id=\"AAAA\" />\n<ATCWaypointEnd id=\"CCCC\" />"));
    }

    #[test]
    fn test_uuid_fresh_per_load() {
        let root = tempdir().unwrap();
        let dir = make_mission(root.path(), &[&[("ICAO", "AAAA")]]);
        let a = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        let b = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        assert_ne!(a.uuid(), b.uuid());
        assert_ne!(a.legs()[0].trigger_id(), b.legs()[0].trigger_id());
    }

    #[test]
    fn test_build_requires_companions() {
        let root = tempdir().unwrap();
        let out = tempdir().unwrap();
        let dir = make_mission(root.path(), &[&[("ICAO", "AAAA")]]);
        let mission = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        let err = mission.build(out.path()).unwrap_err();
        assert!(matches!(err, BuildError::MissingCompanion(p) if p == dir.join(FLIGHT_PLAN_FILE)));
    }

    #[test]
    fn test_build_renders_flt_template() {
        let root = tempdir().unwrap();
        let out = tempdir().unwrap();
        let dir = make_mission(root.path(), &[&[("ICAO", "AAAA")]]);
        write(&dir.join(FLIGHT_PLAN_FILE), "pln");
        write(&dir.join(WEATHER_FILE), "wpr");
        write(&dir.join("images/Loading_Screen.jpg"), "img");
        write(&dir.join("leg.1/briefing.jpg"), "brief");
        write(
            &dir.join(FLT_TEMPLATE_FILE),
            "[Main]\nTitle={title}\nMissionId={mission_id}\nBriefing={main_briefing}\n{leg_briefing_images}\n",
        );

        let mission = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        let artifacts = mission.build(out.path()).unwrap();
        let m = out.path().join("M1");
        assert_eq!(
            artifacts,
            vec![
                m.join("M1.flt"),
                m.join("M1.pln"),
                m.join("M1.xml"),
                m.join("images/1_briefing.jpg"),
                m.join("images/Loading_Screen.jpg"),
                m.join("weather.wpr"),
            ]
        );
        let flt = fs::read_to_string(m.join("M1.flt")).unwrap();
        assert_eq!(
            flt,
            "[Main]\nTitle=TT:BUSH_PACK.M1.TITLE\nMissionId=M1\nBriefing=TT:BUSH_PACK.M1.BRIEFING\nBriefingImage.1=images/1_briefing.jpg\n"
        );
    }

    #[test]
    fn test_build_copies_plain_flt() {
        let root = tempdir().unwrap();
        let out = tempdir().unwrap();
        let dir = make_mission(root.path(), &[&[("ICAO", "AAAA")]]);
        write(&dir.join(FLIGHT_PLAN_FILE), "pln");
        write(&dir.join(WEATHER_FILE), "wpr");
        write(&dir.join(FLT_FILE), "[Main]\n");

        let mission = Mission::load(&dir, &LocalizationRegistry::new()).unwrap();
        mission.build(out.path()).unwrap();
        assert_eq!(
            fs::read_to_string(out.path().join("M1/M1.flt")).unwrap(),
            "[Main]\n"
        );
    }
}
