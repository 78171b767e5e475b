//! Planar geometry between a source and a target image.
//!
//! [`Transformation`] wraps a homography built from four point pairs after
//! a sanity check. [`TransformationFitter`] searches many four-pair samples
//! for the one most pairs agree with, and a valid transformation can paint
//! a replacement image over the target.

pub mod error;
pub mod fitter;
pub mod homography;
pub mod point_pairs;
pub mod transformation;

pub use error::{GeometryError, GeometryResult};
pub use fitter::TransformationFitter;
pub use homography::{Homography, MIN_BUILD_POINTS};
pub use point_pairs::PointPairs;
pub use transformation::Transformation;
