use std::path::PathBuf;
use std::process::ExitCode;

use aruco_tune_core::init_with_level;
use aruco_tune_launch::{aruco_launch, process, PackageIndex};
use clap::Parser;
use log::LevelFilter;

/// Start the camera driver and the ArUco detector.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Install prefix searched before AMENT_PREFIX_PATH (repeatable)
    #[arg(long)]
    prefix: Vec<PathBuf>,
    /// Print the resolved command lines instead of starting anything
    #[arg(long)]
    dry_run: bool,
    /// Log resolved arguments and process lifecycle
    #[arg(short, long)]
    verbose: bool,
    /// Argument overrides, e.g. `camera_config:=camera_720p.yaml`
    #[arg(value_name = "NAME:=VALUE")]
    overrides: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_with_level(if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    })?;

    let index = PackageIndex::from_env().with_overrides(&args.prefix);
    let nodes = aruco_launch().resolve(args.overrides.iter().map(String::as_str), &index)?;

    if args.dry_run {
        for node in &nodes {
            println!("{node}");
        }
        return Ok(ExitCode::SUCCESS);
    }

    let exits = process::run(&nodes)?;
    if exits.iter().all(|e| e.status.success()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
