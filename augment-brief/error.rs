use augment_core::ImageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupted model: too few bytes (expected {expected}, got {actual})")]
    Truncated { expected: usize, actual: usize },
    #[error("Corrupted model: too many bytes (expected {expected}, got {actual})")]
    TrailingBytes { expected: usize, actual: usize },
    #[error("Invalid template size {width}x{height} (both sides must be > 0)")]
    InvalidTemplateSize { width: i64, height: i64 },
    #[error("Model has no angle buckets")]
    NoBuckets,
    #[error("Bucket {bucket} holds {actual} point pairs, expected {expected}")]
    WrongPointCount { bucket: usize, expected: usize, actual: usize },
    #[error("Point ({x}, {y}) of bucket {bucket} is outside the {width}x{height} template")]
    PointOutOfTemplate { bucket: usize, x: i32, y: i32, width: u32, height: u32 },
    #[error("Patch is {actual_width}x{actual_height}, model expects {width}x{height}")]
    WrongPatchSize { width: u32, height: u32, actual_width: u32, actual_height: u32 },
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Keypoint ({x}, {y}) is outside the {width}x{height} image")]
    KeypointOutOfImage { x: i32, y: i32, width: u32, height: u32 },
    #[error("{keypoints} keypoints but {descriptors} descriptors")]
    LengthMismatch { keypoints: usize, descriptors: usize },
}

pub type DescriptorResult<T> = Result<T, DescriptorError>;
