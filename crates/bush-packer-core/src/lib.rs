// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Builds simulator bush trip packs.
//!
//! A pack source tree (`__bush_pack__.json`, `Missions/<id>/leg.N/waypoint.N/...`)
//! is loaded into an immutable entity tree, then built into an output tree with the
//! mission XML files, per-language `.locPak` files and a `layout.json` index.

pub mod artifact;
pub mod bush_pack;
pub mod error;
pub mod layout;
pub mod leg;
pub mod localization;
pub mod mission;
pub mod package_tool;
pub mod pipeline;
pub mod scenery;
pub mod source;
pub mod subleg;
pub mod template;
pub mod waypoint;

pub use artifact::Build;
pub use bush_pack::BushPack;
pub use error::{BuildError, LoadError, PackageToolError, PackerError, TemplateError};
pub use leg::Leg;
pub use localization::{LocalizationRegistry, LocalizedString};
pub use mission::Mission;
pub use scenery::Scenery;
pub use waypoint::{Waypoint, WaypointKind};
