//! Rotation-bucketed binary descriptors.
//!
//! A [`DescriptorModel`] holds, for each of `B` orientation buckets, 128
//! pixel pairs inside a small template. Patches are oriented by their
//! intensity centroid, the closest bucket is picked and each bit records
//! which pixel of a pair is brighter. Descriptors are matched by Hamming
//! distance with a best/second-best margin.

pub mod correspondence;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod matcher;
pub mod model;
pub mod scene;

pub use correspondence::CorrespondenceFinder;
pub use error::{DescriptorError, DescriptorResult};
pub use extractor::DescriptorExtractor;
pub use generator::ModelGenerator;
pub use matcher::DescriptorMatcher;
pub use model::{DescriptorModel, DescriptorModelAtAngle};
pub use scene::{ImageDescription, SceneDescriptorExtractor};

#[cfg(test)]
pub(crate) fn low_bits(n: usize) -> augment_core::Descriptor {
    match n {
        0 => augment_core::Descriptor::ZERO,
        n if n >= augment_core::DESCRIPTOR_BITS => augment_core::Descriptor::ONES,
        n => augment_core::Descriptor((1u128 << n) - 1),
    }
}
