use crate::error::GeometryResult;
use crate::homography::MIN_BUILD_POINTS;
use crate::point_pairs::PointPairs;
use crate::transformation::Transformation;
use augment_core::{Point, RansacConfig};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Outcome of one sampled trial
struct Trial {
    index: usize,
    inliers: usize,
    transformation: Transformation,
}

/// RANSAC over four-point homographies
///
/// Every trial draws its sample from its own generator seeded with
/// `seed + trial`, so the result is the same however Rayon schedules the
/// trials. The best trial has the most inliers, the earliest one on ties.
#[derive(Debug, Clone)]
pub struct TransformationFitter {
    config: RansacConfig,
}

impl Default for TransformationFitter {
    fn default() -> Self {
        Self {
            config: RansacConfig::default(),
        }
    }
}

impl TransformationFitter {
    pub fn new(config: RansacConfig) -> GeometryResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RansacConfig {
        &self.config
    }

    /// Inlier count a trial has to exceed to be accepted
    pub fn acceptance_floor(&self) -> usize {
        (MIN_BUILD_POINTS - 1).saturating_add(self.config.min_non_trivial_inliers)
    }

    pub fn fit(&self, pairs: &PointPairs) -> Transformation {
        if pairs.len() <= MIN_BUILD_POINTS {
            debug!("Only {} point pairs, not fitting", pairs.len());
            return Transformation::invalid();
        }

        let floor = self.acceptance_floor();
        let best = (0..self.config.max_iters)
            .into_par_iter()
            .filter_map(|index| self.run_trial(pairs, index))
            .filter(|trial| trial.inliers > floor)
            .reduce_with(|a, b| {
                if b.inliers > a.inliers || (b.inliers == a.inliers && b.index < a.index) {
                    b
                } else {
                    a
                }
            });

        match best {
            Some(trial) => {
                debug!(
                    "Best of {} trials: {} inliers out of {} pairs",
                    self.config.max_iters,
                    trial.inliers,
                    pairs.len()
                );
                trial.transformation
            }
            None => {
                debug!("No trial exceeded {} inliers", floor);
                Transformation::invalid()
            }
        }
    }

    fn run_trial(&self, pairs: &PointPairs, index: usize) -> Option<Trial> {
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(index as u64));
        let (from, to) = (pairs.from_points(), pairs.to_points());

        let mut sample_from = [Point::default(); MIN_BUILD_POINTS];
        let mut sample_to = [Point::default(); MIN_BUILD_POINTS];
        for (f, t) in sample_from.iter_mut().zip(sample_to.iter_mut()) {
            let i = rng.gen_range(0..pairs.len());
            *f = from[i];
            *t = to[i];
        }

        let transformation = Transformation::build(&sample_from, &sample_to).ok()?;
        let mapped = transformation.apply(from);
        if mapped.is_empty() {
            return None;
        }

        Some(Trial {
            index,
            inliers: self.count_inliers(&mapped, to),
            transformation,
        })
    }

    fn count_inliers(&self, mapped: &[Point], expected: &[Point]) -> usize {
        mapped
            .iter()
            .zip(expected)
            .filter(|(m, e)| m.distance(e) < self.config.epsilon)
            .count()
    }
}
