use aruco_tune_bench::frame::synthetic_frame;
use aruco_tune_bench::{report, BenchConfig, ManualClock, MonotonicClock, Runner};
use aruco_tune_core::{
    DetectError, DetectorFactory, DetectorParams, GrayImageView, Marker, MarkerDetector,
    PresetTable,
};
use std::cell::RefCell;
use std::time::Duration;

/// Stand-in for a real detector that never finds anything.
struct EmptyDetector;

impl MarkerDetector for EmptyDetector {
    fn detect(&self, _: &GrayImageView<'_>) -> Result<Vec<Marker>, DetectError> {
        Ok(Vec::new())
    }
}

/// Remembers the params of every detector it builds.
#[derive(Default)]
struct RecordingFactory {
    seen: RefCell<Vec<DetectorParams>>,
}

impl DetectorFactory for RecordingFactory {
    type Detector = EmptyDetector;

    fn create(&self, params: &DetectorParams) -> Result<EmptyDetector, DetectError> {
        self.seen.borrow_mut().push(params.clone());
        Ok(EmptyDetector)
    }
}

#[test]
fn noise_frame_yields_three_empty_rows() {
    let frame = synthetic_frame(0).expect("synthetic frame");
    assert_eq!((frame.gray.width, frame.gray.height), (640, 480));

    let table = PresetTable::builtin();
    let factory = RecordingFactory::default();
    let runner = Runner::new(&factory, MonotonicClock::new(), BenchConfig::default());
    let records = runner
        .run_table(&table, &frame.gray.view(), |_, _| {})
        .expect("benchmark");

    assert_eq!(records.len(), 3);
    for r in &records {
        assert_eq!(r.num_markers, 0);
        assert!(r.time_ms >= 0.0);
        assert!(r.fps.is_finite());
    }

    let seen = factory.seen.borrow();
    let iters: Vec<_> = seen
        .iter()
        .map(|p| p.corner_refinement_max_iterations)
        .collect();
    assert_eq!(iters, [30, 60, 80]);
}

#[test]
fn full_report_renders_every_section() {
    let frame = synthetic_frame(3).expect("synthetic frame");
    let table = PresetTable::builtin();
    let factory = RecordingFactory::default();
    let runner = Runner::new(&factory, ManualClock::new(), BenchConfig::default());

    let mut out = Vec::new();
    report::write_header(&mut out, &frame).expect("header");
    report::write_config_details(&mut out, &table).expect("config");
    report::write_testing_banner(&mut out).expect("banner");
    let records = runner
        .run_table(&table, &frame.gray.view(), |p, rec| {
            report::write_progress(&mut out, &p.name, rec).expect("progress");
        })
        .expect("benchmark");
    report::write_summary(&mut out, &table, &records).expect("summary");

    let text = String::from_utf8(out).expect("utf8");
    for needle in [
        "ArUco Detection Optimization Comparison",
        "Configuration Details:",
        "Testing original... Done!",
        "Testing maximum... Done!",
        "Results:",
        "Improvements vs Original:",
        "Recommendations:",
    ] {
        assert!(text.contains(needle), "missing `{needle}` in:\n{text}");
    }
    // a clock that never moves gives zero latency and zero fps, not a panic
    assert!(text.contains("original        0          0.00         0.0"));
}

#[test]
fn custom_preset_file_drives_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("presets.toml");
    std::fs::write(
        &path,
        r#"
[[preset]]
name = "fast"
adaptive_thresh_constant = 7
corner_refinement_max_iterations = 10

[[preset]]
name = "careful"
use_clahe = true
use_multi_threshold = true
adaptive_thresh_constant = 4
corner_refinement_max_iterations = 100
"#,
    )
    .expect("write presets");

    let table = PresetTable::load_toml(&path).expect("load presets");
    let frame = synthetic_frame(1).expect("synthetic frame");
    let factory = RecordingFactory::default();
    let clock = ManualClock::new();
    clock.advance(Duration::from_secs(1));
    let runner = Runner::new(&factory, clock, BenchConfig::default());
    let records = runner
        .run_table(&table, &frame.gray.view(), |_, _| {})
        .expect("benchmark");

    let names: Vec<_> = records.iter().map(|r| r.preset.as_str()).collect();
    assert_eq!(names, ["fast", "careful"]);
    assert_eq!(records[0].time_ms, 0.0);
}

#[cfg(feature = "opencv")]
#[test]
fn opencv_finds_nothing_in_noise() {
    use aruco_tune_core::opencv_backend::OpenCvArucoFactory;

    let frame = synthetic_frame(0).expect("synthetic frame");
    let factory = OpenCvArucoFactory;
    let config = BenchConfig {
        warmup: 1,
        iterations: 2,
    };
    let runner = Runner::new(&factory, MonotonicClock::new(), config);
    let records = runner
        .run_table(&PresetTable::builtin(), &frame.gray.view(), |_, _| {})
        .expect("benchmark");
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.num_markers == 0));
}
