//! Contrast-limited adaptive histogram equalization.
//!
//! Matches OpenCV's 8-bit CLAHE: the image is split into a grid of tiles
//! (reflect-101 padded to a multiple of the grid), each tile gets a clipped
//! and equalized lookup table, and every pixel bilinearly blends the tables
//! of its four nearest tile centres.

use crate::preprocess::reflect101;
use crate::{GrayImage, GrayImageView};

const HIST_SIZE: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClaheParams {
    /// Contrast limit relative to a uniform histogram; `<= 0` disables clipping.
    pub clip_limit: f64,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

pub fn clahe(src: &GrayImageView<'_>, params: &ClaheParams) -> GrayImage {
    if src.is_empty() || params.tiles_x == 0 || params.tiles_y == 0 {
        return src.to_owned_image();
    }

    let tiles_x = params.tiles_x;
    let tiles_y = params.tiles_y;
    let padded_w = src.width.div_ceil(tiles_x) * tiles_x;
    let padded_h = src.height.div_ceil(tiles_y) * tiles_y;
    let tile_w = padded_w / tiles_x;
    let tile_h = padded_h / tiles_y;
    let tile_area = tile_w * tile_h;

    let clip = if params.clip_limit > 0.0 {
        Some(((params.clip_limit * tile_area as f64 / HIST_SIZE as f64) as usize).max(1))
    } else {
        None
    };

    let lut_scale = (HIST_SIZE - 1) as f32 / tile_area as f32;
    let mut luts = vec![[0u8; HIST_SIZE]; tiles_x * tiles_y];

    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            let mut hist = [0usize; HIST_SIZE];
            for py in ty * tile_h..(ty + 1) * tile_h {
                let row = src.row(reflect101(py as isize, src.height));
                for px in tx * tile_w..(tx + 1) * tile_w {
                    hist[row[reflect101(px as isize, src.width)] as usize] += 1;
                }
            }

            if let Some(clip) = clip {
                clip_histogram(&mut hist, clip);
            }

            let lut = &mut luts[ty * tiles_x + tx];
            let mut sum = 0usize;
            for (i, &h) in hist.iter().enumerate() {
                sum += h;
                lut[i] = (sum as f32 * lut_scale).round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    let x_taps: Vec<(usize, usize, f32)> = (0..src.width)
        .map(|x| interpolation_tap(x, tile_w, tiles_x))
        .collect();

    let mut out = GrayImage::new(src.width, src.height);
    for y in 0..src.height {
        let (ty1, ty2, ya) = interpolation_tap(y, tile_h, tiles_y);
        let row = src.row(y);
        for (x, &(tx1, tx2, xa)) in x_taps.iter().enumerate() {
            let v = row[x] as usize;
            let top = luts[ty1 * tiles_x + tx1][v] as f32 * (1.0 - xa)
                + luts[ty1 * tiles_x + tx2][v] as f32 * xa;
            let bottom = luts[ty2 * tiles_x + tx1][v] as f32 * (1.0 - xa)
                + luts[ty2 * tiles_x + tx2][v] as f32 * xa;
            let res = top * (1.0 - ya) + bottom * ya;
            out.set(x, y, res.round().clamp(0.0, 255.0) as u8);
        }
    }
    out
}

/// Clip bins at `clip` and spread the excess uniformly, with the residual
/// going one count at a time to evenly spaced bins.
fn clip_histogram(hist: &mut [usize; HIST_SIZE], clip: usize) {
    let mut clipped = 0usize;
    for h in hist.iter_mut() {
        if *h > clip {
            clipped += *h - clip;
            *h = clip;
        }
    }

    let batch = clipped / HIST_SIZE;
    let mut residual = clipped - batch * HIST_SIZE;
    for h in hist.iter_mut() {
        *h += batch;
    }

    if residual != 0 {
        let step = (HIST_SIZE / residual).max(1);
        let mut i = 0;
        while i < HIST_SIZE && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Neighbouring tile indices and blend weight for pixel coordinate `p`.
fn interpolation_tap(p: usize, tile: usize, tiles: usize) -> (usize, usize, f32) {
    let f = p as f32 / tile as f32 - 0.5;
    let t1 = f.floor();
    let a = f - t1;
    let t1 = t1 as isize;
    let lo = t1.max(0) as usize;
    let hi = ((t1 + 1) as usize).min(tiles - 1);
    (lo, hi, a)
}
