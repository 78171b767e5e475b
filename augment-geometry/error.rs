use augment_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Point lists differ in length: {from} vs {to}")]
    LengthMismatch { from: usize, to: usize },
    #[error("Correspondence ({source_index}, {target_index}) out of range for {source_len} source / {target_len} target keypoints")]
    CorrespondenceOutOfRange {
        source_index: usize,
        target_index: usize,
        source_len: usize,
        target_len: usize,
    },
    #[error("Transformation needs exactly {expected} points per side, got {from} and {to}")]
    WrongBuildPointCount { expected: usize, from: usize, to: usize },
    #[error("Invalid fitter configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type GeometryResult<T> = Result<T, GeometryError>;
