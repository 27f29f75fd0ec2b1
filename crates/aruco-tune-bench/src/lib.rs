//! Benchmark harness comparing ArUco detection presets.
//!
//! One frame is acquired (camera, still image, or synthetic noise), then every
//! preset of a [`PresetTable`](aruco_tune_core::PresetTable) is timed on it:
//! a few untimed warm-up calls, then a fixed number of timed calls whose mean
//! is reported together with the detected marker count.

mod clock;
mod error;
pub mod frame;
pub mod report;
mod runner;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{BenchError, FrameError};
pub use frame::{AcquiredFrame, Camera, FrameOrigin};
pub use runner::{fps_from_ms, BenchConfig, BenchmarkRecord, Runner};
