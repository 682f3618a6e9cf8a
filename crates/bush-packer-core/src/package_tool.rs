// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::error::PackageToolError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default install location of the simulator SDK on Windows.
pub const DEFAULT_SDK_ROOT: &str = "C:/MSFS SDK";

#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    pub output_dir: Option<PathBuf>,
    pub temp_dir: Option<PathBuf>,
    /// When false the tool is asked for a full rebuild.
    pub incremental: bool,
}

/// Thin wrapper around the SDK's `fspackagetool.exe`, which turns a built project
/// into the simulator's distributable package.
#[derive(Debug, Clone)]
pub struct PackageTool {
    exe: PathBuf,
}

impl PackageTool {
    pub fn new(sdk_root: &Path) -> Self {
        Self {
            exe: sdk_root.join("Tools").join("bin").join("fspackagetool.exe"),
        }
    }

    pub fn exe(&self) -> &Path {
        &self.exe
    }

    pub fn arguments(project: &Path, options: &PackageOptions) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![project.into()];
        if let Some(out) = &options.output_dir {
            args.push("-outputdir".into());
            args.push(out.into());
        }
        if let Some(tmp) = &options.temp_dir {
            args.push("-tempdir".into());
            args.push(tmp.into());
        }
        if !options.incremental {
            args.push("-rebuild".into());
        }
        args
    }

    pub fn build(&self, project: &Path, options: &PackageOptions) -> Result<(), PackageToolError> {
        if !self.exe.is_file() {
            return Err(PackageToolError::NotFound(self.exe.clone()));
        }
        let args = Self::arguments(project, options);
        log::info!("[PackageTool] Running {:?} {:?}", self.exe, args);
        let status = Command::new(&self.exe)
            .args(&args)
            .status()
            .map_err(|source| PackageToolError::Launch {
                path: self.exe.clone(),
                source,
            })?;
        if !status.success() {
            return Err(PackageToolError::Failed(status));
        }
        Ok(())
    }
}
