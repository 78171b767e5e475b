use crate::matcher::DescriptorMatcher;
use augment_core::{Correspondence, Correspondences, Descriptor};
use log::debug;
use rayon::prelude::*;

/// Best-match search that drops matches without a clear winner
#[derive(Debug, Clone, Copy)]
pub struct CorrespondenceFinder {
    min_top_distance: u32,
}

impl Default for CorrespondenceFinder {
    fn default() -> Self {
        Self::new(4)
    }
}

impl CorrespondenceFinder {
    pub fn new(min_top_distance: u32) -> Self {
        Self { min_top_distance }
    }

    pub fn min_top_distance(&self) -> u32 {
        self.min_top_distance
    }

    /// Match every source descriptor against all targets
    ///
    /// A source is kept only when the second best distance exceeds the best
    /// by at least `min_top_distance`. Needs two or more targets.
    pub fn find(&self, source: &[Descriptor], target: &[Descriptor]) -> Correspondences {
        if source.is_empty() || target.len() < 2 {
            return Correspondences::new();
        }

        let mut correspondences: Correspondences = source
            .par_iter()
            .enumerate()
            .filter_map(|(i, d)| self.best_match(d, target).map(|j| Correspondence::new(i, j)))
            .collect();
        correspondences.sort_by_key(|c| c.source);

        debug!(
            "Found {} correspondences among {} source / {} target descriptors",
            correspondences.len(),
            source.len(),
            target.len()
        );
        correspondences
    }

    fn best_match(&self, d: &Descriptor, target: &[Descriptor]) -> Option<usize> {
        let mut best = u32::MAX;
        let mut second = u32::MAX;
        let mut best_index = 0;
        for (j, t) in target.iter().enumerate() {
            let distance = DescriptorMatcher::distance(d, t);
            if distance <= best {
                second = best;
                best = distance;
                best_index = j;
            } else if distance <= second {
                second = distance;
            }
        }

        (second.saturating_sub(best) >= self.min_top_distance).then_some(best_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use augment_core::DESCRIPTOR_BITS;
    use proptest::prelude::*;

    const TYPICAL_MIN_TOP_DISTANCE: u32 = 15;
    const MAX_DESCRIPTORS: usize = 4;
    const BIT_CHUNK_SIZE: usize = 8;

    fn pairs(raw: &[(usize, usize)]) -> Correspondences {
        raw.iter().map(|&(s, t)| Correspondence::new(s, t)).collect()
    }

    fn sliding_descriptors(chunk: usize) -> Vec<Descriptor> {
        (0..=DESCRIPTOR_BITS).step_by(chunk).map(crate::low_bits).collect()
    }

    #[test]
    fn test_too_few_points() {
        let finder = CorrespondenceFinder::new(TYPICAL_MIN_TOP_DISTANCE);
        let z = Descriptor::ZERO;
        assert!(finder.find(&[], &[]).is_empty());
        assert!(finder.find(&[z], &[]).is_empty());
        assert!(finder.find(&[z], &[z]).is_empty());
        assert!(finder.find(&[], &[z]).is_empty());
        assert!(finder.find(&[], &[z, z]).is_empty());
        assert!(finder.find(&[z, z], &[]).is_empty());
    }

    #[test]
    fn test_min_required_points() {
        let finder = CorrespondenceFinder::new(TYPICAL_MIN_TOP_DISTANCE);
        let found = finder.find(&[Descriptor::ZERO], &[Descriptor::ZERO, Descriptor::ONES]);
        assert_eq!(found, pairs(&[(0, 0)]));
    }

    #[test]
    fn test_all_descriptors_same() {
        let finder = CorrespondenceFinder::new(TYPICAL_MIN_TOP_DISTANCE);
        for bits in (0..DESCRIPTOR_BITS).step_by(DESCRIPTOR_BITS / MAX_DESCRIPTORS) {
            let d = crate::low_bits(bits);
            for n1 in 0..MAX_DESCRIPTORS {
                for n2 in 0..MAX_DESCRIPTORS {
                    assert!(finder.find(&vec![d; n1], &vec![d; n2]).is_empty());
                }
            }
        }
    }

    #[test]
    fn test_same_target_point() {
        let finder = CorrespondenceFinder::new(TYPICAL_MIN_TOP_DISTANCE);
        for n1 in 0..MAX_DESCRIPTORS {
            let source = vec![Descriptor::ZERO; n1];
            let expected: Correspondences = (0..n1).map(|i| Correspondence::new(i, 0)).collect();
            for n2 in 2..MAX_DESCRIPTORS {
                let mut target = vec![Descriptor::ONES; n2];
                target[0] = Descriptor::ZERO;
                assert_eq!(finder.find(&source, &target), expected);
            }
        }
    }

    #[test]
    fn test_diff_target_points() {
        let source = sliding_descriptors(BIT_CHUNK_SIZE);
        let target = sliding_descriptors(BIT_CHUNK_SIZE);
        let identity: Correspondences = (0..source.len()).map(|i| Correspondence::new(i, i)).collect();

        for margin in 0..=DESCRIPTOR_BITS as u32 {
            let expected = if margin <= BIT_CHUNK_SIZE as u32 { identity.clone() } else { Correspondences::new() };
            assert_eq!(CorrespondenceFinder::new(margin).find(&source, &target), expected);
        }
    }

    #[test]
    fn test_ties_go_to_later_target() {
        // Two equally good targets leave no margin, the later one wins when margin is 0
        let finder = CorrespondenceFinder::new(0);
        let found = finder.find(&[Descriptor::ZERO], &[Descriptor::ZERO, Descriptor::ZERO]);
        assert_eq!(found, pairs(&[(0, 1)]));
    }

    proptest! {
        #[test]
        fn prop_sorted_unique_in_range(
            source in proptest::collection::vec(any::<u128>(), 0..40),
            target in proptest::collection::vec(any::<u128>(), 0..40),
            margin in 0u32..20,
        ) {
            let source: Vec<Descriptor> = source.into_iter().map(Descriptor).collect();
            let target: Vec<Descriptor> = target.into_iter().map(Descriptor).collect();
            let found = CorrespondenceFinder::new(margin).find(&source, &target);
            prop_assert!(found.windows(2).all(|w| w[0].source < w[1].source));
            prop_assert!(found.iter().all(|c| c.source < source.len() && c.target < target.len()));
        }

        #[test]
        fn prop_identical_lists_never_match(
            d in any::<u128>(),
            n1 in 0usize..6,
            n2 in 0usize..6,
            margin in 1u32..64,
        ) {
            let d = Descriptor(d);
            prop_assert!(CorrespondenceFinder::new(margin).find(&vec![d; n1], &vec![d; n2]).is_empty());
        }
    }
}
