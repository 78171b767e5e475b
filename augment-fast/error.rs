use augment_core::{ConfigError, ImageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Invalid detector configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Minimum run {min_run} exceeds circle of {ring_len} points")]
    RunLongerThanRing { min_run: usize, ring_len: usize },
}

pub type DetectResult<T> = Result<T, DetectError>;
