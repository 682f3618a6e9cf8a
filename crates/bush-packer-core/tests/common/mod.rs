// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Fixture builder for pack source trees.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Pack `Alaska` with mission `M1`: leg 1 flies from PAJN to ICAO `ABCD`,
/// leg 2 continues to user waypoint `USR1`.
pub fn create_mock_pack() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let pack = temp_dir.path().join("Alaska");

    write(
        &pack.join("__bush_pack__.json"),
        r#"{"version": "1.0.0", "title": {"en-US": "Alaska Bush", "fr-FR": "Brousse d'Alaska"}}"#,
    );

    let mission = pack.join("Missions/M1");
    write(
        &mission.join("__mission__.json"),
        r#"{
            "version": "1.0.0",
            "title": {"en-US": "Panhandle"},
            "description": {"en-US": "Down the panhandle"},
            "location": {"en-US": "Juneau"},
            "initial_fix": "PAJN"
        }"#,
    );
    write(&mission.join("briefing.en-US.txt"), "Welcome aboard");
    write(&mission.join("flight_plan.pln"), "<pln/>");
    write(&mission.join("weather.wpr"), "<wpr/>");
    write(&mission.join("images/Activity_Widget.jpg"), "widget");
    write(&mission.join("images/Loading_Screen.jpg"), "loading");
    write(
        &mission.join("mission.flt_template"),
        "[Main]\nTitle={title}\nDescription={description}\nLocation={location}\nBriefing={main_briefing}\n{leg_briefing_images}\n",
    );

    let leg1 = mission.join("leg.1");
    write(&leg1.join("__leg__.json"), r#"{"description": {"en-US": "To ABCD"}}"#);
    write(&leg1.join("briefing.jpg"), "leg briefing");
    let wpt = leg1.join("waypoint.1");
    write(&wpt.join("__waypoint__.json"), r#"{"type": "ICAO", "ident": "ABCD"}"#);
    write(&wpt.join("description.en-US.txt"), "Gravel strip");
    write(&wpt.join("description.fr-FR.txt"), "Piste en gravier");
    write(&wpt.join("image.png"), "abcd");

    let leg2 = mission.join("leg.2");
    write(&leg2.join("__leg__.json"), r#"{"description": {"en-US": "To the lake"}}"#);
    write(
        &leg2.join("waypoint.1/__waypoint__.json"),
        r#"{"type": "user", "ident": "USR1"}"#,
    );

    fs::create_dir_all(pack.join("Sceneries/AlaskaAirstrips")).unwrap();

    (temp_dir, pack)
}
