use crate::augmenter::SceneAugmenter;
use crate::error::AugmenterResult;
use augment_brief::DescriptorModel;
use augment_core::AugmentConfig;
use std::sync::Arc;

/// Builder for creating a [`SceneAugmenter`]
#[derive(Debug, Clone)]
pub struct AugmenterBuilder {
    model: Arc<DescriptorModel>,
    config: AugmentConfig,
}

impl AugmenterBuilder {
    /// Create a new builder with default settings
    pub fn new(model: Arc<DescriptorModel>) -> Self {
        Self {
            model,
            config: AugmentConfig::default(),
        }
    }

    /// Create a builder from an existing configuration
    pub fn from_config(model: Arc<DescriptorModel>, config: AugmentConfig) -> Self {
        Self { model, config }
    }

    /// Set the corner brightness threshold, images are in [0, 1]
    pub fn pixel_threshold(mut self, threshold: f32) -> Self {
        self.config.detector.pixel_threshold = threshold;
        self
    }

    /// Set the radius of the sampling circle
    pub fn radius(mut self, radius: u32) -> Self {
        self.config.detector.radius = radius;
        self
    }

    /// Set the contiguous run required on the diamond and on the full circle
    pub fn min_runs(mut self, diamond: usize, circle: usize) -> Self {
        self.config.detector.diamond_min_run = diamond;
        self.config.detector.circle_min_run = circle;
        self
    }

    /// Set the required gap between the two closest descriptor matches
    pub fn min_top_distance(mut self, distance: u32) -> Self {
        self.config.min_top_distance = distance;
        self
    }

    /// Set the number of RANSAC trials
    pub fn max_iters(mut self, iters: usize) -> Self {
        self.config.ransac.max_iters = iters;
        self
    }

    /// Set the inlier distance in pixels
    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.config.ransac.epsilon = epsilon;
        self
    }

    pub fn min_non_trivial_inliers(mut self, inliers: usize) -> Self {
        self.config.ransac.min_non_trivial_inliers = inliers;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.ransac.seed = seed;
        self
    }

    /// Set the number of threads for parallel processing
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Apply the fast preset, keeping the thread count
    pub fn preset_fast(mut self) -> Self {
        self.config = AugmentConfig {
            n_threads: self.config.n_threads,
            ..AugmentConfig::fast_preset()
        };
        self
    }

    /// Apply the robust preset, keeping the thread count
    pub fn preset_robust(mut self) -> Self {
        self.config = AugmentConfig {
            n_threads: self.config.n_threads,
            ..AugmentConfig::robust_preset()
        };
        self
    }

    pub fn summary(&self) -> String {
        self.config.summary()
    }

    pub fn config(&self) -> &AugmentConfig {
        &self.config
    }

    pub fn to_config(self) -> AugmentConfig {
        self.config
    }

    /// Build the `SceneAugmenter`, validating the configuration
    pub fn build(self) -> AugmenterResult<SceneAugmenter> {
        SceneAugmenter::new(self.model, self.config)
    }
}
