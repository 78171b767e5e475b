use crate::error::ConfigError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of points in the stage-one diamond ring
pub const DIAMOND_RING_LEN: usize = 4;

/// Corner test parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// Minimum brightness difference for a ring pixel to count (images in [0, 1])
    pub pixel_threshold: f32,
    /// Radius of both sampling rings, also the untested border width
    pub radius: u32,
    /// Contiguous ring pixels required by the diamond pre-test
    pub diamond_min_run: usize,
    /// Contiguous ring pixels required by the full circle test
    pub circle_min_run: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            pixel_threshold: 0.15,
            radius: 3,
            diamond_min_run: 3,
            circle_min_run: 12,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.pixel_threshold.is_finite() || self.pixel_threshold < 0.0 {
            return Err(ConfigError::InvalidPixelThreshold(self.pixel_threshold));
        }
        if self.radius == 0 {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if self.diamond_min_run == 0 || self.diamond_min_run > DIAMOND_RING_LEN {
            return Err(ConfigError::InvalidMinRun {
                min_run: self.diamond_min_run,
                ring_len: DIAMOND_RING_LEN,
            });
        }
        Ok(())
    }
}

/// Robust fitting parameters
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RansacConfig {
    /// Number of trials, always run to completion
    pub max_iters: usize,
    /// Inlier distance in pixels
    pub epsilon: f32,
    /// Inliers required beyond the 4 sampled pairs before a fit is accepted
    pub min_non_trivial_inliers: usize,
    /// Seed of the per-trial generators
    pub seed: u64,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            max_iters: 50_000,
            epsilon: 3.0,
            min_non_trivial_inliers: 2,
            seed: 0,
        }
    }
}

impl RansacConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iters == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AugmentConfig {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Required gap between the best and second-best match distance
    pub min_top_distance: u32,
    /// Worker threads, 0 lets Rayon decide
    pub n_threads: usize,
    pub detector: DetectorConfig,
    pub ransac: RansacConfig,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            min_top_distance: 4,
            ransac: RansacConfig::default(),
            n_threads: num_cpus::get().max(1),
            name: None,
        }
    }
}

impl AugmentConfig {
    /// Fewer trials and a stricter match margin, for previews
    pub fn fast_preset() -> Self {
        Self {
            min_top_distance: 8,
            ransac: RansacConfig {
                max_iters: 5_000,
                ..RansacConfig::default()
            },
            name: Some("Fast".to_string()),
            ..Self::default()
        }
    }

    /// More trials and a looser inlier radius for cluttered scenes
    pub fn robust_preset() -> Self {
        Self {
            min_top_distance: 4,
            ransac: RansacConfig {
                max_iters: 200_000,
                epsilon: 4.0,
                ..RansacConfig::default()
            },
            name: Some("Robust".to_string()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.detector.validate()?;
        self.ransac.validate()
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "AugmentConfig{}: threshold={}, radius={}, runs={}/{}, min_top_distance={}, ransac=[iters:{}, eps:{}, min_inliers:+{}, seed:{}], threads={}",
            self.name.as_deref().map(|n| format!(" '{}'", n)).unwrap_or_default(),
            self.detector.pixel_threshold,
            self.detector.radius,
            self.detector.diamond_min_run,
            self.detector.circle_min_run,
            self.min_top_distance,
            self.ransac.max_iters,
            self.ransac.epsilon,
            self.ransac.min_non_trivial_inliers,
            self.ransac.seed,
            self.n_threads,
        )
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json` or `.toml` file, chosen by extension (TOML otherwise)
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_toml(&content),
        }
    }

    /// Save to a `.json` or `.toml` file, chosen by extension (TOML otherwise)
    #[cfg(feature = "serde")]
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => self.to_json()?,
            _ => self.to_toml()?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}
