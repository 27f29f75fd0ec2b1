//! Preset-driven detection: preprocessing plus optional adaptive/Otsu merge.

use crate::preprocess::{Preprocessor, RustPreprocessor};
use crate::{
    DetectError, DetectorFactory, DetectorParams, GrayImageView, Marker, MarkerDetector, Preset,
};
use std::collections::HashSet;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Concatenate detection passes keeping the first marker seen for every id.
///
/// Earlier passes take priority: a later detection of an id that is already
/// present is dropped, as is a repeated id within a single pass.
pub fn merge_by_id<I>(passes: I) -> Vec<Marker>
where
    I: IntoIterator<Item = Vec<Marker>>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for pass in passes {
        for marker in pass {
            if seen.insert(marker.id) {
                out.push(marker);
            }
        }
    }
    out
}

/// A detector bound to the preset that configured it, plus the backend's
/// preprocessing stages.
pub struct MarkerPipeline<D> {
    detector: D,
    preprocessor: Box<dyn Preprocessor>,
    preset: Preset,
}

impl<D: MarkerDetector> MarkerPipeline<D> {
    /// Pipeline using the portable [`RustPreprocessor`].
    pub fn new(detector: D, preset: Preset) -> Self {
        Self::with_preprocessor(detector, Box::new(RustPreprocessor::default()), preset)
    }

    pub fn with_preprocessor(
        detector: D,
        preprocessor: Box<dyn Preprocessor>,
        preset: Preset,
    ) -> Self {
        Self {
            detector,
            preprocessor,
            preset,
        }
    }

    /// Build the detector for `preset` and the preprocessing stages through
    /// `factory`.
    pub fn from_factory<F>(factory: &F, preset: &Preset) -> Result<Self, DetectError>
    where
        F: DetectorFactory<Detector = D>,
    {
        let params = DetectorParams::for_preset(preset);
        let detector = factory.create(&params)?;
        let preprocessor = factory.preprocessor()?;
        Ok(Self::with_preprocessor(detector, preprocessor, preset.clone()))
    }

    pub fn preset(&self) -> &Preset {
        &self.preset
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Preprocess `gray` and detect markers.
    ///
    /// With `use_multi_threshold`, the detector runs on the preprocessed image
    /// and then on its Otsu binarization; the adaptive pass wins ties on id.
    /// Otherwise the single detector call is returned untouched.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, gray),
            fields(preset = %self.preset.name)
        )
    )]
    pub fn detect(&self, gray: &GrayImageView<'_>) -> Result<Vec<Marker>, DetectError> {
        let processed = self.preprocessor.preprocess(gray, &self.preset)?;

        if !self.preset.use_multi_threshold {
            return self.detector.detect(&processed.view());
        }

        let adaptive = self.detector.detect(&processed.view())?;
        let otsu_img = self.preprocessor.otsu_binarize(&processed.view())?;
        let otsu = self.detector.detect(&otsu_img.view())?;
        Ok(merge_by_id([adaptive, otsu]))
    }
}
