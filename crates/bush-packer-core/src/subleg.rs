// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Older single-file waypoint format.
//!
//! A `subleg.N` file inside a leg folder starts with `key: value` header lines
//! (`waypoint`, `user_waypoint`, `image`), ends its header at the first blank line,
//! and carries the description text after it:
//!
//! ```text
//! waypoint: PAKT
//! image: ketchikan.jpg
//!
//! Follow the channel south to Ketchikan.
//! ```

use crate::error::LoadError;
use crate::localization::{Alternatives, LocalizationRegistry, DEFAULT_LANGUAGE};
use crate::source::parse_index;
use crate::waypoint::{description_id, Waypoint, WaypointKind};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SublegDescriptor {
    pub kind: WaypointKind,
    pub ident: String,
    pub image: Option<String>,
    pub description: String,
}

fn header_regex() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| {
        Regex::new(r"(?i)^(?P<key>waypoint|user_waypoint|image):\s*(?P<value>.*)$")
            .expect("valid sub-leg header pattern")
    })
}

pub fn parse(text: &str, path: &Path) -> Result<SublegDescriptor, LoadError> {
    let mut in_header = true;
    let mut header: BTreeMap<String, String> = BTreeMap::new();
    let mut description = Vec::new();

    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() {
            in_header = false;
        } else if in_header {
            let cap = header_regex().captures(stripped).ok_or_else(|| {
                LoadError::MalformedHeaderLine {
                    path: path.to_path_buf(),
                    line: line.to_string(),
                }
            })?;
            let key = cap["key"].to_lowercase();
            if header.contains_key(&key) {
                return Err(LoadError::DuplicateHeaderKey {
                    path: path.to_path_buf(),
                    key,
                });
            }
            header.insert(key, cap["value"].trim().to_string());
        } else {
            description.push(stripped);
        }
    }

    let (kind, ident) = if let Some(ident) = header.remove("waypoint") {
        (WaypointKind::Icao, ident)
    } else if let Some(ident) = header.remove("user_waypoint") {
        (WaypointKind::User, ident)
    } else {
        return Err(LoadError::MissingHeader(path.to_path_buf()));
    };

    Ok(SublegDescriptor {
        kind,
        ident,
        image: header.remove("image"),
        description: description.join("\n"),
    })
}

/// Loads a `subleg.N` file as the waypoint at position N-1 of the leg.
pub fn load(
    file: &Path,
    mission_id: &str,
    leg_index: i32,
    registry: &LocalizationRegistry,
) -> Result<Waypoint, LoadError> {
    let position = parse_index(file, "subleg")?;
    let text = std::fs::read_to_string(file).map_err(|e| LoadError::io(file, e))?;
    let descriptor = parse(&text, file)?;

    let mut alternatives = Alternatives::new();
    if !descriptor.description.is_empty() {
        alternatives.insert(DEFAULT_LANGUAGE.to_string(), descriptor.description);
    }
    let description = registry.intern(description_id(mission_id, leg_index, position), alternatives);
    let leg_dir = file.parent().unwrap_or(Path::new("."));
    let image: Option<PathBuf> = descriptor.image.map(|rel| leg_dir.join(rel));

    Waypoint::new(
        descriptor.kind,
        leg_index,
        position,
        descriptor.ident,
        Some(description),
        image,
        file,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> PathBuf {
        PathBuf::from("leg.1/subleg.1")
    }

    #[test]
    fn test_parse_icao_with_description() {
        let d = parse(
            "Waypoint: PAKT\nimage: ketchikan.jpg\n\nFollow the channel.\n  Land on 11.  \n",
            &path(),
        )
        .unwrap();
        assert_eq!(d.kind, WaypointKind::Icao);
        assert_eq!(d.ident, "PAKT");
        assert_eq!(d.image.as_deref(), Some("ketchikan.jpg"));
        assert_eq!(d.description, "Follow the channel.\nLand on 11.");
    }

    #[test]
    fn test_parse_user_waypoint() {
        let d = parse("user_waypoint: LAKE1\n", &path()).unwrap();
        assert_eq!(d.kind, WaypointKind::User);
        assert_eq!(d.ident, "LAKE1");
        assert_eq!(d.description, "");
    }

    #[test]
    fn test_duplicate_key() {
        let err = parse("waypoint: A\nWAYPOINT: B\n", &path()).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateHeaderKey { key, .. } if key == "waypoint"));
    }

    #[test]
    fn test_malformed_header_line() {
        let err = parse("waypoint: A\nrunway: 11\n", &path()).unwrap_err();
        assert!(matches!(err, LoadError::MalformedHeaderLine { .. }));
    }

    #[test]
    fn test_missing_header() {
        let err = parse("image: a.jpg\n\ntext", &path()).unwrap_err();
        assert!(matches!(err, LoadError::MissingHeader(p) if p == path()));
    }

    #[test]
    fn test_load_interns_default_language() {
        let dir = tempfile::tempdir().unwrap();
        let leg = dir.path().join("leg.2");
        std::fs::create_dir_all(&leg).unwrap();
        let file = leg.join("subleg.3");
        std::fs::write(&file, "user_waypoint: LAKE1\n\nSeaplane base").unwrap();

        let registry = LocalizationRegistry::new();
        let wpt = load(&file, "M1", 1, &registry).unwrap();
        assert_eq!(wpt.position(), 2);
        assert_eq!(wpt.region_code().as_deref(), Some("!B"));
        let dump = registry.dump_all();
        assert_eq!(dump["en-US"]["BUSH_PACK.M1.WPT2x03.DESCRIPTION"], "Seaplane base");
    }

    #[test]
    fn test_load_without_text_still_has_token() {
        let dir = tempfile::tempdir().unwrap();
        let leg = dir.path().join("leg.1");
        std::fs::create_dir_all(&leg).unwrap();
        let file = leg.join("subleg.1");
        std::fs::write(&file, "waypoint: PAKT\n").unwrap();

        let registry = LocalizationRegistry::new();
        let wpt = load(&file, "M1", 0, &registry).unwrap();
        assert_eq!(wpt.description().unwrap().id(), "BUSH_PACK.M1.WPT1x01.DESCRIPTION");
        assert!(registry.dump_all().is_empty());
    }
}
