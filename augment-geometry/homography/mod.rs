//! Four-point projective transforms: building, sanity checking and evaluation.

pub mod builder;
pub mod evaluator;
pub mod sanity;

pub use builder::Builder;
pub use evaluator::Evaluator;
pub use sanity::SanityChecker;

/// Point pairs needed to pin down a homography
pub const MIN_BUILD_POINTS: usize = 4;

/// Row-major 3x3 projective matrix acting on `(x, y, 1)`
pub type Homography = nalgebra::Matrix3<f64>;
