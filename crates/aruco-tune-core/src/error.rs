/// Errors raised while building or looking up detection presets.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("unknown preset `{name}` (available: {available})")]
    UnknownPreset { name: String, available: String },
    #[error("duplicate preset `{0}`")]
    DuplicatePreset(String),
    #[error("preset table is empty")]
    EmptyTable,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

/// Errors raised by a marker detector backend or by image plumbing around it.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid grayscale image buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid grayscale image dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("detector backend failed: {0}")]
    Backend(String),

    #[cfg(feature = "opencv")]
    #[error(transparent)]
    OpenCv(#[from] opencv::Error),
}
