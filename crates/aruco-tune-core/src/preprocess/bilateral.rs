//! Edge-preserving bilateral smoothing.

use crate::preprocess::reflect101;
use crate::{GrayImage, GrayImageView};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BilateralParams {
    /// Neighbourhood diameter in pixels.
    pub diameter: usize,
    pub sigma_color: f32,
    pub sigma_space: f32,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            diameter: 5,
            sigma_color: 50.0,
            sigma_space: 50.0,
        }
    }
}

pub fn bilateral_filter(src: &GrayImageView<'_>, params: &BilateralParams) -> GrayImage {
    if src.is_empty() {
        return src.to_owned_image();
    }

    let radius = (params.diameter / 2).max(1) as isize;
    let sigma_color = f64::from(params.sigma_color);
    let sigma_space = f64::from(params.sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    // weights are evaluated in f64 and stored as f32, accumulation is f32
    let color_weight: Vec<f32> = (0..256)
        .map(|d| ((d * d) as f64 * color_coeff).exp() as f32)
        .collect();

    // circular support
    let mut taps: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r = ((dx * dx + dy * dy) as f64).sqrt();
            if r > radius as f64 {
                continue;
            }
            taps.push((dx, dy, (r * r * space_coeff).exp() as f32));
        }
    }

    let mut out = GrayImage::new(src.width, src.height);
    for y in 0..src.height {
        for x in 0..src.width {
            let center = src.get(x, y) as i32;
            let mut sum = 0f32;
            let mut wsum = 0f32;
            for &(dx, dy, ws) in &taps {
                let sx = reflect101(x as isize + dx, src.width);
                let sy = reflect101(y as isize + dy, src.height);
                let v = src.get(sx, sy) as i32;
                let w = ws * color_weight[(v - center).unsigned_abs() as usize];
                sum += w * v as f32;
                wsum += w;
            }
            out.set(x, y, (sum / wsum).round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_hard_edge() {
        let mut data = Vec::new();
        for _ in 0..16 {
            data.extend(std::iter::repeat(10u8).take(8));
            data.extend(std::iter::repeat(240u8).take(8));
        }
        let img = GrayImage::from_vec(16, 16, data).expect("image");
        let out = bilateral_filter(&img.view(), &BilateralParams::default());
        // a 230 step is far outside sigma_color, so neither side bleeds
        assert!(out.view().get(7, 8) < 20);
        assert!(out.view().get(8, 8) > 230);
    }

    #[test]
    fn smooths_small_ripple() {
        let data: Vec<u8> = (0..256).map(|i| if i % 2 == 0 { 120 } else { 130 }).collect();
        let img = GrayImage::from_vec(16, 16, data).expect("image");
        let out = bilateral_filter(&img.view(), &BilateralParams::default());
        let spread = out.data.iter().max().expect("px") - out.data.iter().min().expect("px");
        assert!(spread < 10, "ripple not reduced: {spread}");
    }

    #[test]
    fn constant_image_is_fixed_point() {
        let img = GrayImage::from_vec(9, 7, vec![64; 63]).expect("image");
        let out = bilateral_filter(&img.view(), &BilateralParams::default());
        assert_eq!(out, img);
    }

    #[test]
    fn edge_and_ripple_match_reference_values() {
        #[rustfmt::skip]
        let img = GrayImage::from_vec(6, 5, vec![
             10,  10,  10, 240, 240, 240,
             10,  10,  10, 240, 240, 240,
             10,  10,  10, 240, 240, 240,
            130, 120, 130, 120, 130, 120,
            120, 130, 120, 130, 120, 130,
        ]).expect("image");
        let out = bilateral_filter(&img.view(), &BilateralParams::default());
        #[rustfmt::skip]
        let expected = vec![
             10,  10,  10, 240, 240, 240,
             11,  11,  11, 239, 239, 239,
             14,  14,  16, 234, 236, 236,
            124, 119, 126, 124, 131, 126,
            122, 125, 122, 128, 125, 128,
        ];
        assert_eq!(out.data, expected);
    }
}
