//! Image preprocessing applied before marker detection.
//!
//! Order is fixed: CLAHE first (if enabled), then the bilateral filter (if
//! enabled). The input is never modified; a new image is always returned.
//!
//! The stages sit behind [`Preprocessor`] so a vision backend can supply its
//! own routines. [`RustPreprocessor`] is the portable implementation used when
//! no backend provides one.

mod bilateral;
mod clahe;
mod threshold;

pub use bilateral::{bilateral_filter, BilateralParams};
pub use clahe::{clahe, ClaheParams};
pub use threshold::{binarize, otsu_binarize, otsu_level};

use crate::{DetectError, GrayImage, GrayImageView, Preset};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// CLAHE, bilateral filtering and Otsu binarization with the benchmark's
/// fixed settings (8x8 tiles at clip 2.0; diameter 5 with sigmas 50/50).
pub trait Preprocessor {
    fn clahe(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError>;

    fn bilateral(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError>;

    /// `255` where `pixel > t` for the Otsu level `t`, else `0`.
    fn otsu_binarize(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError>;

    /// Apply the preset's preprocessing chain.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, src, preset),
            fields(preset = %preset.name, width = src.width, height = src.height)
        )
    )]
    fn preprocess(&self, src: &GrayImageView<'_>, preset: &Preset) -> Result<GrayImage, DetectError> {
        let mut out = if preset.use_clahe {
            self.clahe(src)?
        } else {
            src.to_owned_image()
        };

        if preset.use_bilateral {
            out = self.bilateral(&out.view())?;
        }

        Ok(out)
    }
}

impl<P: Preprocessor + ?Sized> Preprocessor for Box<P> {
    fn clahe(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        (**self).clahe(src)
    }

    fn bilateral(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        (**self).bilateral(src)
    }

    fn otsu_binarize(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        (**self).otsu_binarize(src)
    }

    fn preprocess(&self, src: &GrayImageView<'_>, preset: &Preset) -> Result<GrayImage, DetectError> {
        (**self).preprocess(src, preset)
    }
}

/// Pure-Rust stages reproducing OpenCV's 8-bit semantics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RustPreprocessor {
    pub clahe: ClaheParams,
    pub bilateral: BilateralParams,
}

impl Preprocessor for RustPreprocessor {
    fn clahe(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        Ok(clahe(src, &self.clahe))
    }

    fn bilateral(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        Ok(bilateral_filter(src, &self.bilateral))
    }

    fn otsu_binarize(&self, src: &GrayImageView<'_>) -> Result<GrayImage, DetectError> {
        Ok(otsu_binarize(src))
    }
}

/// Reflect-101 border index (`gfedcb|abcdefgh|gfedcba`).
pub(crate) fn reflect101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}
