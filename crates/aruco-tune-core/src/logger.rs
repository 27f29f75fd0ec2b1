//! Diagnostics for the benchmark and launcher binaries.
//!
//! Everything goes to stderr. The benchmark writes its report to stdout and
//! the launcher shares its terminal with child nodes, so log lines must never
//! land on stdout. Lines look like `[  0.012s  WARN aruco_tune_bench::frame] ...`.

use std::fmt;
use std::io::Write;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

/// Names accepted by [`parse_level_filter`].
pub const LEVEL_NAMES: &str = "off, error, warn, info, debug, trace";

/// Parse a `--log-level` value, case-insensitively.
///
/// Meant as a clap `value_parser`, so an unknown name is rejected at the
/// command line instead of falling back silently.
pub fn parse_level_filter(raw: &str) -> Result<LevelFilter, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("unknown log level `{raw}` (expected one of: {LEVEL_NAMES})"))
}

fn format_line(elapsed: Duration, level: Level, target: &str, args: &fmt::Arguments<'_>) -> String {
    format!("[{:7.3}s {:>5} {target}] {args}", elapsed.as_secs_f64(), level)
}

struct DiagnosticLogger {
    max: LevelFilter,
    origin: Instant,
}

impl Log for DiagnosticLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format_line(
                self.origin.elapsed(),
                record.level(),
                record.target(),
                record.args(),
            );
            let _ = writeln!(std::io::stderr().lock(), "{line}");
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<DiagnosticLogger> = OnceLock::new();

/// Route `log` records at or above `level` to stderr.
///
/// Only the first call installs the logger; later calls succeed and keep the
/// level chosen first.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| DiagnosticLogger {
        max: level,
        origin: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Install a `tracing` subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `level` is the filter. Span close
/// events carry the time spent in instrumented preprocessing and detection.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    let builder = tracing_fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(tracing_fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
