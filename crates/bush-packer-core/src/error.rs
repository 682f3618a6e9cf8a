// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the source tree. Any of these aborts the whole load.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot derive an id from {0:?}: the path has no folder name")]
    UnnamedFolder(PathBuf),
    #[error("Missing metadata file: {0:?}")]
    MissingMetadata(PathBuf),
    #[error("Malformed metadata in {path:?}: {source}")]
    MalformedMetadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid waypoint type in {path:?} (must be either 'user' or 'ICAO'): {value}")]
    InvalidWaypointType { path: PathBuf, value: String },
    #[error("Invalid folder name {path:?}: expected '{prefix}.<number>' with number >= 1")]
    InvalidIndex { path: PathBuf, prefix: &'static str },
    #[error("Duplicate {kind} index {index} in {path:?}")]
    DuplicateIndex {
        path: PathBuf,
        kind: &'static str,
        index: i32,
    },
    #[error("User waypoint {ident} in {path:?} sits in leg {leg}, region codes only cover legs 1 to 26")]
    RegionOutOfRange {
        path: PathBuf,
        ident: String,
        leg: i32,
    },
    #[error("Duplicate key in {path:?}: {key}")]
    DuplicateHeaderKey { path: PathBuf, key: String },
    #[error("Malformed line in {path:?}: {line}")]
    MalformedHeaderLine { path: PathBuf, line: String },
    #[error("Missing header in {0:?}: requires either waypoint or user_waypoint")]
    MissingHeader(PathBuf),
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors from the placeholder substitution in `.xml_template` / `.flt_template` files.
#[derive(Error, Debug, PartialEq)]
pub enum TemplateError {
    #[error("Unknown placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),
    #[error("Unbalanced brace at byte {0}")]
    UnbalancedBrace(usize),
}

/// Failures while writing the output tree.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Missing source file: {0:?}")]
    MissingCompanion(PathBuf),
    #[error("{0:?} is not a regular file, only files belong in layout.json")]
    NotAFile(PathBuf),
    #[error("Template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },
    #[error("Leg {leg} of mission {mission} has no waypoint to land at")]
    EmptyLeg { mission: String, leg: i32 },
    #[error("Failed to serialize {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn template(name: impl Into<String>, source: TemplateError) -> Self {
        BuildError::Template {
            name: name.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum PackageToolError {
    #[error("Package tool not found at {0:?}")]
    NotFound(PathBuf),
    #[error("Failed to launch {path:?}: {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Package tool exited with {0}")]
    Failed(std::process::ExitStatus),
}

/// Top-level error of a full pipeline run.
#[derive(Error, Debug)]
pub enum PackerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Build(#[from] BuildError),
}
