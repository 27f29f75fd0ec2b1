//! Acquisition of the single frame every preset is benchmarked on.

use crate::FrameError;
use aruco_tune_core::GrayImage;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::path::{Path, PathBuf};

/// Size of the synthetic fallback frame.
pub const SYNTHETIC_WIDTH: usize = 640;
pub const SYNTHETIC_HEIGHT: usize = 480;

/// A capture device that hands out one frame at a time.
pub trait Camera {
    /// Try to open the device. `Ok(false)` means it is not available.
    fn open(&mut self) -> Result<bool, FrameError>;
    /// Read one frame as gray. `Ok(None)` means the read failed.
    fn read_gray(&mut self) -> Result<Option<GrayImage>, FrameError>;
    fn release(&mut self);
    /// Device index, for messages.
    fn index(&self) -> i32;
}

/// Where the benchmark frame came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FrameOrigin {
    Camera { index: i32 },
    Image(PathBuf),
    Synthetic { seed: u64 },
}

impl fmt::Display for FrameOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera { index } => write!(f, "camera {index}"),
            Self::Image(path) => write!(f, "image {}", path.display()),
            Self::Synthetic { seed } => write!(f, "synthetic noise (seed {seed})"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AcquiredFrame {
    pub gray: GrayImage,
    pub origin: FrameOrigin,
}

impl AcquiredFrame {
    /// One-line summary, e.g. `Using camera 0 frame: 640x480`.
    pub fn describe(&self) -> String {
        format!(
            "Using {} frame: {}x{}",
            self.origin, self.gray.width, self.gray.height
        )
    }
}

/// Uniform 3-channel noise (values `0..255`, exclusive) converted to gray.
pub fn synthetic_noise(width: usize, height: usize, seed: u64) -> Result<GrayImage, FrameError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let bgr: Vec<u8> = (0..width * height * 3)
        .map(|_| rng.gen_range(0..255u8))
        .collect();
    Ok(GrayImage::from_bgr(width, height, &bgr)?)
}

pub fn synthetic_frame(seed: u64) -> Result<AcquiredFrame, FrameError> {
    Ok(AcquiredFrame {
        gray: synthetic_noise(SYNTHETIC_WIDTH, SYNTHETIC_HEIGHT, seed)?,
        origin: FrameOrigin::Synthetic { seed },
    })
}

/// Grab one frame: open, read, release.
///
/// A camera that cannot be opened falls back to synthetic noise; a camera
/// that opens but yields no frame is an error.
pub fn acquire_from_camera<C: Camera + ?Sized>(
    camera: &mut C,
    fallback_seed: u64,
) -> Result<AcquiredFrame, FrameError> {
    let index = camera.index();
    if !camera.open()? {
        warn!("could not open camera {index}, using synthetic test frame instead");
        return synthetic_frame(fallback_seed);
    }

    let frame = camera.read_gray();
    camera.release();
    match frame? {
        Some(gray) => {
            info!("captured {}x{} frame from camera {index}", gray.width, gray.height);
            Ok(AcquiredFrame {
                gray,
                origin: FrameOrigin::Camera { index },
            })
        }
        None => Err(FrameError::ReadFailed { index }),
    }
}

/// Load a still image from disk as gray.
pub fn load_image(path: &Path) -> Result<AcquiredFrame, FrameError> {
    let img = image::ImageReader::open(path).map_err(image::ImageError::IoError)?.decode()?.to_luma8();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let gray = GrayImage::from_vec(w, h, img.into_raw())?;
    Ok(AcquiredFrame {
        gray,
        origin: FrameOrigin::Image(path.to_path_buf()),
    })
}

#[cfg(feature = "opencv")]
pub use self::opencv_camera::OpenCvCamera;

#[cfg(feature = "opencv")]
mod opencv_camera {
    use super::Camera;
    use crate::FrameError;
    use aruco_tune_core::opencv_backend::mat_to_gray;
    use aruco_tune_core::GrayImage;
    use opencv::core::Mat;
    use opencv::imgproc::{self, COLOR_BGR2GRAY, COLOR_BGRA2GRAY};
    use opencv::prelude::*;
    use opencv::videoio::{VideoCapture, CAP_ANY};

    /// `cv::VideoCapture` on a device index.
    pub struct OpenCvCamera {
        index: i32,
        cap: Option<VideoCapture>,
    }

    impl OpenCvCamera {
        pub fn new(index: i32) -> Self {
            Self { index, cap: None }
        }
    }

    /// Convert a captured frame to single-channel gray with `cvtColor`.
    pub(crate) fn frame_to_gray(frame: &Mat) -> Result<GrayImage, FrameError> {
        let code = match frame.channels() {
            1 => return Ok(mat_to_gray(frame)?),
            3 => COLOR_BGR2GRAY,
            4 => COLOR_BGRA2GRAY,
            n => return Err(FrameError::UnsupportedChannels(n)),
        };
        let mut gray = Mat::default();
        imgproc::cvt_color(frame, &mut gray, code, 0)?;
        Ok(mat_to_gray(&gray)?)
    }

    impl Camera for OpenCvCamera {
        fn open(&mut self) -> Result<bool, FrameError> {
            let cap = VideoCapture::new(self.index, CAP_ANY)?;
            let opened = cap.is_opened()?;
            if opened {
                self.cap = Some(cap);
            }
            Ok(opened)
        }

        fn read_gray(&mut self) -> Result<Option<GrayImage>, FrameError> {
            let Some(cap) = self.cap.as_mut() else {
                return Ok(None);
            };
            let mut frame = Mat::default();
            if !cap.read(&mut frame)? || frame.empty() {
                return Ok(None);
            }
            frame_to_gray(&frame).map(Some)
        }

        fn release(&mut self) {
            if let Some(mut cap) = self.cap.take() {
                if let Err(e) = cap.release() {
                    log::warn!("failed to release camera {}: {e}", self.index);
                }
            }
        }

        fn index(&self) -> i32 {
            self.index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeCamera {
        opens: bool,
        frame: Option<GrayImage>,
        released: bool,
    }

    impl Camera for FakeCamera {
        fn open(&mut self) -> Result<bool, FrameError> {
            Ok(self.opens)
        }
        fn read_gray(&mut self) -> Result<Option<GrayImage>, FrameError> {
            Ok(self.frame.take())
        }
        fn release(&mut self) {
            self.released = true;
        }
        fn index(&self) -> i32 {
            0
        }
    }

    #[test]
    fn unavailable_camera_falls_back_to_noise() {
        let mut cam = FakeCamera {
            opens: false,
            frame: None,
            released: false,
        };
        let frame = acquire_from_camera(&mut cam, 42).expect("fallback");
        assert_eq!(frame.origin, FrameOrigin::Synthetic { seed: 42 });
        assert_eq!((frame.gray.width, frame.gray.height), (640, 480));
    }

    #[test]
    fn failed_read_is_an_error_and_releases() {
        let mut cam = FakeCamera {
            opens: true,
            frame: None,
            released: false,
        };
        let err = acquire_from_camera(&mut cam, 0).unwrap_err();
        assert!(matches!(err, FrameError::ReadFailed { index: 0 }));
        assert!(cam.released);
    }

    #[test]
    fn camera_frame_is_used_when_available() {
        let mut cam = FakeCamera {
            opens: true,
            frame: Some(GrayImage::new(8, 6)),
            released: false,
        };
        let frame = acquire_from_camera(&mut cam, 0).expect("frame");
        assert_eq!(frame.origin, FrameOrigin::Camera { index: 0 });
        assert_eq!(frame.describe(), "Using camera 0 frame: 8x6");
        assert!(cam.released);
    }

    #[test]
    fn synthetic_noise_is_seeded() {
        let a = synthetic_noise(32, 16, 7).expect("noise");
        let b = synthetic_noise(32, 16, 7).expect("noise");
        let c = synthetic_noise(32, 16, 8).expect("noise");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.data.len(), 32 * 16);
    }

    #[test]
    fn loads_png_as_gray() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("frame.png");
        let img = image::GrayImage::from_fn(5, 3, |x, y| image::Luma([(x * 10 + y) as u8]));
        img.save(&path).expect("save png");

        let frame = load_image(&path).expect("load");
        assert_eq!((frame.gray.width, frame.gray.height), (5, 3));
        assert_eq!(frame.gray.view().get(4, 2), 42);
        assert_eq!(frame.origin, FrameOrigin::Image(path));
    }

    #[cfg(feature = "opencv")]
    #[test]
    fn cvt_color_handles_three_and_four_channels() {
        use opencv::core::{Mat, Scalar, CV_8UC3, CV_8UC4};

        let bgr = Mat::new_rows_cols_with_default(2, 3, CV_8UC3, Scalar::new(0.0, 110.0, 70.0, 0.0))
            .expect("bgr");
        let gray = opencv_camera::frame_to_gray(&bgr).expect("gray");
        assert_eq!((gray.width, gray.height), (3, 2));
        assert!(gray.data.iter().all(|&v| v == 85));

        let bgra =
            Mat::new_rows_cols_with_default(2, 3, CV_8UC4, Scalar::new(0.0, 110.0, 70.0, 255.0))
                .expect("bgra");
        let gray = opencv_camera::frame_to_gray(&bgra).expect("gray");
        assert!(gray.data.iter().all(|&v| v == 85));

        let portable = GrayImage::from_bgr(1, 1, &[0, 110, 70]).expect("gray");
        assert_eq!(portable.data, [85]);
    }
}
