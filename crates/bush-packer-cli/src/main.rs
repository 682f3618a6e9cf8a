// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use bush_packer_core::package_tool::{PackageOptions, PackageTool, DEFAULT_SDK_ROOT};
use bush_packer_core::pipeline;
use clap::{ArgAction, Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a bush trip pack from its source tree
    Build {
        /// Pack source folder (contains __bush_pack__.json)
        src_dir: PathBuf,
        /// Folder the pack is built into; <DIST_DIR>/<pack> is replaced
        dist_dir: PathBuf,
    },
    /// Run the SDK package tool on a built project
    Package {
        /// Project definition to package
        project: PathBuf,
        /// Simulator SDK install folder
        #[arg(long, env = "MSFS_SDK", default_value = DEFAULT_SDK_ROOT)]
        sdk_root: PathBuf,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        tmp_dir: Option<PathBuf>,
        /// Rebuild everything instead of an incremental build
        #[arg(long)]
        rebuild: bool,
    },
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let config = ConfigBuilder::new()
        .add_filter_allow_str("bush_packer")
        .build();
    // Only fails when a logger is already installed
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Build { src_dir, dist_dir } => {
            let artifacts = pipeline::run(&src_dir, &dist_dir)
                .with_context(|| format!("Failed to build pack from {:?}", src_dir))?;
            println!("Built {} files into {:?}", artifacts.len(), dist_dir);
        }
        Commands::Package {
            project,
            sdk_root,
            out_dir,
            tmp_dir,
            rebuild,
        } => {
            let tool = PackageTool::new(&sdk_root);
            let options = PackageOptions {
                output_dir: out_dir,
                temp_dir: tmp_dir,
                incremental: !rebuild,
            };
            tool.build(&project, &options)
                .with_context(|| format!("Failed to package {:?}", project))?;
            println!("Packaged {:?}", project);
        }
    }

    Ok(())
}
