use crate::{BenchError, Clock};
use aruco_tune_core::{DetectorFactory, GrayImageView, MarkerPipeline, Preset, PresetTable};
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Trial counts for one preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Untimed calls absorbing one-time initialization cost.
    pub warmup: usize,
    /// Timed calls averaged into the reported latency.
    pub iterations: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            warmup: 3,
            iterations: 10,
        }
    }
}

/// Result of benchmarking one preset.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchmarkRecord {
    pub preset: String,
    pub num_markers: usize,
    /// Mean per-call latency in milliseconds.
    pub time_ms: f64,
    pub fps: f64,
}

/// `1000 / ms`, or `0` when no time elapsed.
pub fn fps_from_ms(ms: f64) -> f64 {
    if ms > 0.0 {
        1000.0 / ms
    } else {
        0.0
    }
}

/// Times presets on a single frame using detectors from `factory`.
pub struct Runner<'a, F, C> {
    factory: &'a F,
    clock: C,
    config: BenchConfig,
}

impl<'a, F: DetectorFactory, C: Clock> Runner<'a, F, C> {
    pub fn new(factory: &'a F, clock: C, config: BenchConfig) -> Self {
        Self {
            factory,
            clock,
            config,
        }
    }

    pub fn config(&self) -> BenchConfig {
        self.config
    }

    /// Warm up, then time `iterations` calls of the preset's pipeline.
    ///
    /// The marker count is taken from the last timed call. Detector errors
    /// abort the preset.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, preset, gray), fields(preset = %preset.name))
    )]
    pub fn run_preset(
        &self,
        preset: &Preset,
        gray: &GrayImageView<'_>,
    ) -> Result<BenchmarkRecord, BenchError> {
        if self.config.iterations == 0 {
            return Err(BenchError::NoIterations);
        }

        let pipeline = MarkerPipeline::from_factory(self.factory, preset)?;

        for _ in 0..self.config.warmup {
            pipeline.detect(gray)?;
        }

        let start = self.clock.now();
        let mut last = Vec::new();
        for _ in 0..self.config.iterations {
            last = pipeline.detect(gray)?;
        }
        let elapsed = self.clock.now().saturating_sub(start);

        let time_ms = elapsed.as_secs_f64() * 1000.0 / self.config.iterations as f64;
        let record = BenchmarkRecord {
            preset: preset.name.clone(),
            num_markers: last.len(),
            time_ms,
            fps: fps_from_ms(time_ms),
        };
        debug!(
            "{}: {} markers, {:.3} ms/frame",
            record.preset, record.num_markers, record.time_ms
        );
        Ok(record)
    }

    /// Benchmark every preset in table order.
    ///
    /// `on_progress` is called before each preset starts and after it finishes
    /// (with the record), for progress output.
    pub fn run_table<P>(
        &self,
        table: &PresetTable,
        gray: &GrayImageView<'_>,
        mut on_progress: P,
    ) -> Result<Vec<BenchmarkRecord>, BenchError>
    where
        P: FnMut(&Preset, Option<&BenchmarkRecord>),
    {
        let mut records = Vec::with_capacity(table.len());
        for preset in table {
            on_progress(preset, None);
            let record = self.run_preset(preset, gray)?;
            on_progress(preset, Some(&record));
            records.push(record);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use approx::assert_relative_eq;
    use aruco_tune_core::{DetectError, DetectorParams, GrayImage, Marker, MarkerDetector};
    use nalgebra::Point2;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    /// Advances a shared clock by a fixed amount on every call.
    struct SlowDetector {
        clock: ManualClock,
        per_call: Duration,
        ids: Vec<i32>,
        calls: Rc<Cell<usize>>,
    }

    impl MarkerDetector for SlowDetector {
        fn detect(&self, _: &GrayImageView<'_>) -> Result<Vec<Marker>, DetectError> {
            self.clock.advance(self.per_call);
            self.calls.set(self.calls.get() + 1);
            let quad = [Point2::new(0.0, 0.0); 4];
            Ok(self.ids.iter().map(|&id| Marker::new(id, quad)).collect())
        }
    }

    struct SlowFactory {
        clock: ManualClock,
        per_call: Duration,
        ids: Vec<i32>,
        calls: Rc<Cell<usize>>,
    }

    impl DetectorFactory for SlowFactory {
        type Detector = SlowDetector;

        fn create(&self, _: &DetectorParams) -> Result<SlowDetector, DetectError> {
            Ok(SlowDetector {
                clock: self.clock.clone(),
                per_call: self.per_call,
                ids: self.ids.clone(),
                calls: self.calls.clone(),
            })
        }
    }

    fn factory(per_call_ms: u64, ids: Vec<i32>) -> (SlowFactory, ManualClock) {
        let clock = ManualClock::new();
        let f = SlowFactory {
            clock: clock.clone(),
            per_call: Duration::from_millis(per_call_ms),
            ids,
            calls: Rc::new(Cell::new(0)),
        };
        (f, clock)
    }

    #[test]
    fn mean_equals_fixed_call_duration() {
        let (f, clock) = factory(4, vec![1, 2]);
        let runner = Runner::new(&f, clock, BenchConfig::default());
        let img = GrayImage::new(16, 16);
        let rec = runner
            .run_preset(&Preset::original(), &img.view())
            .expect("run");

        assert_relative_eq!(rec.time_ms, 4.0, epsilon = 1e-9);
        assert_relative_eq!(rec.fps, 250.0, epsilon = 1e-6);
        assert_eq!(rec.num_markers, 2);
        assert_eq!(rec.preset, "original");
        // warm-up calls run but are not timed
        assert_eq!(f.calls.get(), 13);
    }

    #[test]
    fn multi_pass_presets_time_both_passes() {
        let (f, clock) = factory(2, vec![3]);
        let runner = Runner::new(&f, clock, BenchConfig::default());
        let img = GrayImage::new(16, 16);
        let rec = runner
            .run_preset(&Preset::optimized(), &img.view())
            .expect("run");

        assert_relative_eq!(rec.time_ms, 4.0, epsilon = 1e-9);
        // same id from both passes is merged
        assert_eq!(rec.num_markers, 1);
        assert_eq!(f.calls.get(), 26);
    }

    #[test]
    fn zero_elapsed_gives_zero_fps() {
        let (f, clock) = factory(0, vec![]);
        let runner = Runner::new(&f, clock, BenchConfig::default());
        let img = GrayImage::new(4, 4);
        let rec = runner
            .run_preset(&Preset::original(), &img.view())
            .expect("run");
        assert_eq!(rec.num_markers, 0);
        assert_eq!(rec.time_ms, 0.0);
        assert_eq!(rec.fps, 0.0);
    }

    #[test]
    fn zero_iterations_is_rejected() {
        let (f, clock) = factory(1, vec![]);
        let cfg = BenchConfig {
            warmup: 0,
            iterations: 0,
        };
        let runner = Runner::new(&f, clock, cfg);
        let img = GrayImage::new(4, 4);
        let err = runner
            .run_preset(&Preset::original(), &img.view())
            .unwrap_err();
        assert!(matches!(err, BenchError::NoIterations));
    }

    #[test]
    fn run_table_reports_in_table_order() {
        let (f, clock) = factory(1, vec![]);
        let runner = Runner::new(&f, clock, BenchConfig::default());
        let img = GrayImage::new(8, 8);
        let mut events = Vec::new();
        let records = runner
            .run_table(&PresetTable::builtin(), &img.view(), |p, rec| {
                events.push((p.name.clone(), rec.is_some()));
            })
            .expect("run");

        let names: Vec<_> = records.iter().map(|r| r.preset.as_str()).collect();
        assert_eq!(names, ["original", "optimized", "maximum"]);
        assert_eq!(events.len(), 6);
        assert_eq!(events[0], ("original".to_string(), false));
        assert_eq!(events[1], ("original".to_string(), true));
    }

    #[test]
    fn fps_helper() {
        assert_relative_eq!(fps_from_ms(20.0), 50.0);
        assert_eq!(fps_from_ms(0.0), 0.0);
    }
}
