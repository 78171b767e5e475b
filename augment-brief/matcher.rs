use augment_core::Descriptor;

/// Hamming distance between binary descriptors
pub struct DescriptorMatcher;

impl DescriptorMatcher {
    /// Number of differing bits, smaller is more similar
    #[inline(always)]
    pub fn distance(a: &Descriptor, b: &Descriptor) -> u32 {
        (a.0 ^ b.0).count_ones()
    }
}
