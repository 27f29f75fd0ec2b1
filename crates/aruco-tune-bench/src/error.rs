use aruco_tune_core::{ConfigError, DetectError};

/// Errors raised while acquiring the benchmark frame.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("could not read frame from camera {index}")]
    ReadFailed { index: i32 },
    #[error("unsupported frame with {0} channels")]
    UnsupportedChannels(i32),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[cfg(feature = "opencv")]
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}

/// Errors that abort a benchmark run.
#[derive(thiserror::Error, Debug)]
pub enum BenchError {
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Detect(#[from] DetectError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("timed iteration count must be at least 1")]
    NoIterations,
}
