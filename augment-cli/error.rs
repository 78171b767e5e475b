use augment_brief::DescriptorError;
use augment_core::{ConfigError, ImageError};
use augment_fast::DetectError;
use augment_geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AugmenterError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Keypoint detection failed: {0}")]
    Detect(#[from] DetectError),
    #[error("Description failed: {0}")]
    Descriptor(#[from] DescriptorError),
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Source image is not set")]
    SourceNotSet,
    #[error("Replacement image is not set")]
    ReplacementNotSet,
}

pub type AugmenterResult<T> = Result<T, AugmenterError>;
