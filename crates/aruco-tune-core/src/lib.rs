//! Core types and glue for ArUco detection benchmarks.
//!
//! This crate does *not* detect markers itself. Marker detection is delegated
//! to an external vision library behind the [`MarkerDetector`] trait; the
//! bundled backend (feature `opencv`) calls OpenCV's ArUco module.
//!
//! What lives here:
//! - immutable detection presets and the [`PresetTable`] they are looked up in,
//! - backend-neutral [`DetectorParams`] built from a preset,
//! - preprocessing (CLAHE, bilateral filter, Otsu binarization),
//! - the multi-pass [`MarkerPipeline`] that merges adaptive and Otsu passes by id,
//! - the stderr logger shared by the binaries.
//!
//! ## Quickstart
//!
//! ```no_run
//! use aruco_tune_core::{GrayImage, MarkerDetector, MarkerPipeline, PresetTable};
//! # fn run<D: MarkerDetector>(detector: D) -> Result<(), Box<dyn std::error::Error>> {
//! let presets = PresetTable::builtin();
//! let preset = presets.get("optimized")?;
//! let pipeline = MarkerPipeline::new(detector, preset.clone());
//!
//! let frame = GrayImage::new(640, 480);
//! let markers = pipeline.detect(&frame.view())?;
//! println!("markers: {}", markers.len());
//! # Ok(())
//! # }
//! ```

mod detector;
mod error;
mod image;
mod logger;
mod marker;
mod params;
mod pipeline;
pub mod preprocess;
mod preset;

#[cfg(feature = "opencv")]
pub mod opencv_backend;

pub use detector::{DetectorFactory, MarkerDetector};
pub use error::{ConfigError, DetectError};
pub use image::{GrayImage, GrayImageView};
pub use marker::{Marker, MarkerDictionary};
pub use params::{CornerRefineMethod, DetectorParams};
pub use pipeline::{merge_by_id, MarkerPipeline};
pub use preprocess::{Preprocessor, RustPreprocessor};
pub use preset::{Preset, PresetTable};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, parse_level_filter, LEVEL_NAMES};
