//! Corner detection by contiguous brightness arcs on midpoint circles.
//!
//! ```no_run
//! use augment_core::{DetectorConfig, GrayF32Image};
//! use augment_fast::KeypointDetector;
//!
//! let detector = KeypointDetector::new(DetectorConfig::default())?;
//! let keypoints = detector.detect(&GrayF32Image::new(64, 64))?;
//! assert!(keypoints.is_empty());
//! # Ok::<(), augment_fast::DetectError>(())
//! ```

pub mod circle;
pub mod detector;
pub mod error;
pub mod types;
pub mod utils;

pub use circle::CircleBuilder;
pub use detector::KeypointDetector;
pub use error::{DetectError, DetectResult};
pub use types::Polarity;
