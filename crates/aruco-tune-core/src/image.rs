use crate::DetectError;

/// Borrowed 8-bit grayscale image, row-major, `data.len() == width * height`.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

/// Owned 8-bit grayscale image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl<'a> GrayImageView<'a> {
    /// Wrap a raw buffer, checking that its length matches the dimensions.
    pub fn from_slice(width: usize, height: usize, data: &'a [u8]) -> Result<Self, DetectError> {
        let expected = width
            .checked_mul(height)
            .ok_or(DetectError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(DetectError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_owned_image(&self) -> GrayImage {
        GrayImage {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

const GRAY_SHIFT: u32 = 14;
const GRAY_ROUND: u32 = 1 << (GRAY_SHIFT - 1);
const B2Y: u32 = 1868;
const G2Y: u32 = 9617;
const R2Y: u32 = 4899;

impl GrayImage {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self, DetectError> {
        GrayImageView::from_slice(width, height, &data)?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Convert interleaved 3-channel BGR pixels to gray.
    ///
    /// Uses OpenCV's 14-bit fixed-point BT.601 weights so the result is
    /// bit-identical to `COLOR_BGR2GRAY`.
    pub fn from_bgr(width: usize, height: usize, bgr: &[u8]) -> Result<Self, DetectError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(DetectError::InvalidDimensions { width, height })?;
        if bgr.len() != expected {
            return Err(DetectError::InvalidBuffer {
                expected,
                got: bgr.len(),
            });
        }
        let data = bgr
            .chunks_exact(3)
            .map(|px| {
                let (b, g, r) = (u32::from(px[0]), u32::from(px[1]), u32::from(px[2]));
                ((b * B2Y + g * G2Y + r * R2Y + GRAY_ROUND) >> GRAY_SHIFT) as u8
            })
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }
}
