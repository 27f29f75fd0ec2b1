use std::io::{self, Write};
use std::path::PathBuf;

use aruco_tune_bench::frame::{self, OpenCvCamera};
use aruco_tune_bench::{report, BenchConfig, FrameError, MonotonicClock, Runner};
use aruco_tune_core::opencv_backend::OpenCvArucoFactory;
use aruco_tune_core::{parse_level_filter, PresetTable};
use clap::Parser;

use log::{info, LevelFilter};

#[cfg(feature = "tracing")]
use aruco_tune_core::init_tracing;
#[cfg(feature = "tracing")]
use tracing_log::LogTracer;
#[cfg(not(feature = "tracing"))]
use aruco_tune_core::init_with_level;

/// Compare ArUco detection presets on a single frame.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Camera index to grab the frame from
    #[arg(short, long, default_value_t = 0)]
    camera: i32,
    /// Benchmark a still image instead of a camera frame
    #[arg(short, long, conflicts_with = "synthetic")]
    image: Option<PathBuf>,
    /// Skip the camera and use synthetic noise
    #[arg(long)]
    synthetic: bool,
    /// Seed for the synthetic noise frame
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// TOML file with `[[preset]]` entries replacing the built-in presets
    #[arg(short, long)]
    presets: Option<PathBuf>,
    /// Untimed warm-up calls per preset
    #[arg(long, default_value_t = 3)]
    warmup: usize,
    /// Timed calls per preset
    #[arg(short = 'n', long, default_value_t = 10)]
    iterations: usize,
    /// Log level for diagnostics on stderr (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", value_parser = parse_level_filter)]
    log_level: LevelFilter,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    #[cfg(not(feature = "tracing"))]
    init_with_level(args.log_level)?;
    #[cfg(feature = "tracing")]
    {
        // an earlier LogTracer install is fine
        let _ = LogTracer::init();
        init_tracing(args.log_level, false);
    }

    let presets = match &args.presets {
        Some(path) => {
            let table = PresetTable::load_toml(path)?;
            info!("loaded {} presets from {}", table.len(), path.display());
            table
        }
        None => PresetTable::builtin(),
    };

    let acquired = if let Some(path) = &args.image {
        frame::load_image(path)
    } else if args.synthetic {
        frame::synthetic_frame(args.seed)
    } else {
        frame::acquire_from_camera(&mut OpenCvCamera::new(args.camera), args.seed)
    };
    let acquired = match acquired {
        Ok(f) => f,
        Err(FrameError::ReadFailed { .. }) => {
            println!("Error: Could not read frame");
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    report::write_header(&mut out, &acquired)?;
    report::write_config_details(&mut out, &presets)?;
    report::write_testing_banner(&mut out)?;

    let config = BenchConfig {
        warmup: args.warmup,
        iterations: args.iterations,
    };
    let factory = OpenCvArucoFactory;
    let runner = Runner::new(&factory, MonotonicClock::new(), config);

    let mut progress_err = None;
    let records = runner.run_table(&presets, &acquired.gray.view(), |preset, record| {
        if let Err(e) = report::write_progress(&mut out, &preset.name, record) {
            progress_err.get_or_insert(e);
        }
    })?;
    if let Some(e) = progress_err {
        return Err(e.into());
    }

    report::write_summary(&mut out, &presets, &records)?;
    out.flush()?;
    Ok(())
}
