//! Global Otsu binarization.

use crate::{GrayImage, GrayImageView};

/// 256-bin intensity histogram.
pub(crate) fn histogram(src: &GrayImageView<'_>) -> [u32; 256] {
    let mut hist = [0u32; 256];
    for &v in src.data {
        hist[v as usize] += 1;
    }
    hist
}

/// Otsu threshold of an image: the level maximizing between-class variance.
///
/// Follows OpenCV's `THRESH_OTSU` for 8-bit input, including its tie rule
/// (first maximum wins) and its treatment of degenerate classes: levels where
/// either class holds less than `f32::EPSILON` of the mass are skipped. An
/// image with a single intensity has no valid level and yields `0`.
pub fn otsu_level(src: &GrayImageView<'_>) -> u8 {
    if src.data.is_empty() {
        return 0;
    }
    otsu_from_histogram(&histogram(src))
}

fn otsu_from_histogram(hist: &[u32; 256]) -> u8 {
    let total: u64 = hist.iter().map(|&h| u64::from(h)).sum();
    if total == 0 {
        return 0;
    }
    let scale = 1.0 / total as f64;
    let eps = f64::from(f32::EPSILON);

    let mu: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &h)| i as f64 * f64::from(h))
        .sum::<f64>()
        * scale;

    let mut q1 = 0f64;
    let mut mu1 = 0f64;
    let mut best_sigma = 0f64;
    let mut best_t = 0u8;

    for (i, &h) in hist.iter().enumerate() {
        let p_i = f64::from(h) * scale;
        mu1 *= q1;
        q1 += p_i;
        let q2 = 1.0 - q1;
        if q1.min(q2) < eps || q1.max(q2) > 1.0 - eps {
            continue;
        }

        mu1 = (mu1 + i as f64 * p_i) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > best_sigma {
            best_sigma = sigma;
            best_t = i as u8;
        }
    }

    best_t
}

/// Binarize with the Otsu level: `255` where `pixel > t`, else `0`.
pub fn otsu_binarize(src: &GrayImageView<'_>) -> GrayImage {
    let t = otsu_level(src);
    binarize(src, t)
}

/// Fixed-level binarization: `255` where `pixel > t`, else `0`.
pub fn binarize(src: &GrayImageView<'_>, t: u8) -> GrayImage {
    GrayImage {
        width: src.width,
        height: src.height,
        data: src
            .data
            .iter()
            .map(|&v| if v > t { 255 } else { 0 })
            .collect(),
    }
}
