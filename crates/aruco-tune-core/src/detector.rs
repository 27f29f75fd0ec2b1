//! Seam between the benchmark glue and the external marker detector.

use crate::preprocess::{Preprocessor, RustPreprocessor};
use crate::{DetectError, DetectorParams, GrayImageView, Marker};

/// A configured marker detector.
///
/// Implementations wrap a vision library call. The returned markers are in
/// the library's own order; callers must not assume ids are unique.
pub trait MarkerDetector {
    fn detect(&self, image: &GrayImageView<'_>) -> Result<Vec<Marker>, DetectError>;
}

impl<D: MarkerDetector + ?Sized> MarkerDetector for &D {
    fn detect(&self, image: &GrayImageView<'_>) -> Result<Vec<Marker>, DetectError> {
        (**self).detect(image)
    }
}

impl<D: MarkerDetector + ?Sized> MarkerDetector for Box<D> {
    fn detect(&self, image: &GrayImageView<'_>) -> Result<Vec<Marker>, DetectError> {
        (**self).detect(image)
    }
}

/// Builds detectors from backend-neutral parameters.
pub trait DetectorFactory {
    type Detector: MarkerDetector;

    fn create(&self, params: &DetectorParams) -> Result<Self::Detector, DetectError>;

    /// Preprocessing stages that go with this backend's detectors.
    ///
    /// Backends wrapping a vision library return its own routines so that
    /// timings cover the library code; the default is [`RustPreprocessor`].
    fn preprocessor(&self) -> Result<Box<dyn Preprocessor>, DetectError> {
        Ok(Box::new(RustPreprocessor::default()))
    }
}
