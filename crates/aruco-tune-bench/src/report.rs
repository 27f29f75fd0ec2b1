//! Human-readable comparison report.
//!
//! Everything is written to a caller-supplied `io::Write` (stdout in the
//! binary). There is no machine-readable format.

use crate::{AcquiredFrame, BenchmarkRecord};
use aruco_tune_core::PresetTable;
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

/// Informational pointer printed at the end of the report.
pub const TUNING_FILE: &str = "config/aruco_advanced.yaml";

/// One preset compared against the baseline (first) record.
#[derive(Clone, Debug, PartialEq)]
pub struct Improvement {
    pub preset: String,
    pub num_markers: usize,
    pub marker_delta: i64,
    pub time_overhead_ms: f64,
    /// Overhead relative to the baseline time; `0` when the baseline took no time.
    pub time_overhead_pct: f64,
    pub fps: f64,
}

/// Compare every record after the first against the first.
pub fn improvements(records: &[BenchmarkRecord]) -> Vec<Improvement> {
    let Some((base, rest)) = records.split_first() else {
        return Vec::new();
    };
    rest.iter()
        .map(|r| {
            let time_overhead_ms = r.time_ms - base.time_ms;
            let time_overhead_pct = if base.time_ms > 0.0 {
                time_overhead_ms / base.time_ms * 100.0
            } else {
                0.0
            };
            Improvement {
                preset: r.preset.clone(),
                num_markers: r.num_markers,
                marker_delta: r.num_markers as i64 - base.num_markers as i64,
                time_overhead_ms,
                time_overhead_pct,
                fps: r.fps,
            }
        })
        .collect()
}

fn rule(out: &mut impl Write, ch: char) -> io::Result<()> {
    writeln!(out, "{}", ch.to_string().repeat(RULE_WIDTH))
}

fn section(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    rule(out, '-')?;
    writeln!(out, "{title}")?;
    rule(out, '-')
}

/// `+n` for gains, `-n` for losses, bare `0` when unchanged.
fn signed_count(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn write_header(out: &mut impl Write, frame: &AcquiredFrame) -> io::Result<()> {
    writeln!(out, "ArUco Detection Optimization Comparison")?;
    rule(out, '=')?;
    writeln!(out)?;
    writeln!(out, "{}", frame.describe())
}

/// Dump every preset's fields in table order.
pub fn write_config_details(out: &mut impl Write, table: &PresetTable) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Configuration Details:")?;
    rule(out, '-')?;
    for preset in table {
        writeln!(out)?;
        writeln!(out, "{}:", preset.name.to_uppercase())?;
        for (key, value) in preset.fields() {
            writeln!(out, "  {key}: {value}")?;
        }
    }
    Ok(())
}

pub fn write_testing_banner(out: &mut impl Write) -> io::Result<()> {
    section(out, "Testing configurations...")
}

/// Progress line: `Testing <name>... ` then `Done!` once the record exists.
pub fn write_progress(
    out: &mut impl Write,
    preset: &str,
    record: Option<&BenchmarkRecord>,
) -> io::Result<()> {
    match record {
        None => {
            writeln!(out)?;
            write!(out, "Testing {preset}... ")?;
            out.flush()
        }
        Some(_) => writeln!(out, "Done!"),
    }
}

pub fn write_results(out: &mut impl Write, records: &[BenchmarkRecord]) -> io::Result<()> {
    section(out, "Results:")?;
    writeln!(
        out,
        "{:<15} {:<10} {:<12} {:<10}",
        "Configuration", "Markers", "Time (ms)", "FPS"
    )?;
    rule(out, '-')?;
    for r in records {
        writeln!(
            out,
            "{:<15} {:<10} {:<12.2} {:<10.1}",
            r.preset, r.num_markers, r.time_ms, r.fps
        )?;
    }
    Ok(())
}

pub fn write_improvements(out: &mut impl Write, records: &[BenchmarkRecord]) -> io::Result<()> {
    let Some(base) = records.first() else {
        return Ok(());
    };
    section(out, &format!("Improvements vs {}:", capitalize(&base.preset)))?;
    for imp in improvements(records) {
        writeln!(out)?;
        writeln!(out, "{}:", imp.preset.to_uppercase())?;
        writeln!(
            out,
            "  Markers detected: {} ({})",
            imp.num_markers,
            signed_count(imp.marker_delta)
        )?;
        writeln!(
            out,
            "  Processing time: {:+.2}ms ({:+.1}%)",
            imp.time_overhead_ms, imp.time_overhead_pct
        )?;
        writeln!(out, "  Still achieves {:.1} FPS", imp.fps)?;
    }
    Ok(())
}

/// Usage advice for the built-in presets present in `table`.
pub fn write_recommendations(out: &mut impl Write, table: &PresetTable) -> io::Result<()> {
    section(out, "Recommendations:")?;
    let advice = [
        (
            "optimized",
            "Use 'optimized' for best balance (good detection, acceptable speed)",
        ),
        (
            "maximum",
            "Use 'maximum' for challenging conditions (low light, motion blur)",
        ),
        (
            "original",
            "Use 'original' only if processing time is critical and lighting is perfect",
        ),
    ];
    for (name, line) in advice {
        if table.get(name).is_ok() {
            writeln!(out, "\u{2022} {line}")?;
        }
    }
    writeln!(out)?;
    writeln!(out, "To adjust settings, edit: {TUNING_FILE}")?;
    writeln!(out)
}

/// Everything after the benchmark has run: results, deltas, advice.
pub fn write_summary(
    out: &mut impl Write,
    table: &PresetTable,
    records: &[BenchmarkRecord],
) -> io::Result<()> {
    write_results(out, records)?;
    writeln!(out)?;
    write_improvements(out, records)?;
    writeln!(out)?;
    write_recommendations(out, table)
}
