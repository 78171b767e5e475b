use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image is empty ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("Unsupported pixel type: {0} (expected 8-bit or 32-bit float, 1 or 3 channels)")]
    UnsupportedPixelType(String),
}

pub type ImageResult<T> = Result<T, ImageError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid pixel threshold: {0} (must be finite and non-negative)")]
    InvalidPixelThreshold(f32),
    #[error("Invalid sampling radius: {0} (must be >= 1)")]
    InvalidRadius(u32),
    #[error("Invalid minimum run {min_run} for a ring of {ring_len} points")]
    InvalidMinRun { min_run: usize, ring_len: usize },
    #[error("Invalid inlier distance: {0} (must be finite and > 0)")]
    InvalidEpsilon(f32),
    #[error("Invalid RANSAC trial count: 0")]
    ZeroIterations,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "serde")]
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[cfg(feature = "serde")]
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}
