use augment_core::{DetectorConfig, GrayF32Image, ImageError, Keypoint, Point};
use crate::circle::CircleBuilder;
use crate::error::{DetectError, DetectResult};
use crate::types::{PolarKeypoint, SamplingRing};
use crate::utils::arc_polarity;
use log::debug;
use rayon::prelude::*;

/// Two-stage contiguous-arc corner detector
///
/// A cheap four-point diamond rejects most pixels; survivors must then show
/// a long bright or dark arc on the full midpoint circle of the same radius.
pub struct KeypointDetector {
    cfg: DetectorConfig,
    diamond: SamplingRing,
    circle: SamplingRing,
}

impl KeypointDetector {
    /// Creates a new detector with validation
    pub fn new(cfg: DetectorConfig) -> DetectResult<Self> {
        cfg.validate()?;

        let offsets = CircleBuilder::build(cfg.radius);
        if cfg.circle_min_run == 0 || cfg.circle_min_run > offsets.len() {
            return Err(DetectError::RunLongerThanRing {
                min_run: cfg.circle_min_run,
                ring_len: offsets.len(),
            });
        }

        let diamond = SamplingRing::diamond(cfg.radius as i32, cfg.diamond_min_run);
        let circle = SamplingRing {
            offsets,
            min_run: cfg.circle_min_run,
        };

        Ok(Self { cfg, diamond, circle })
    }

    /// Detect keypoints in row-major order
    pub fn detect(&self, img: &GrayF32Image) -> DetectResult<Vec<Keypoint>> {
        Ok(self
            .detect_with_polarity(img)?
            .into_iter()
            .map(|pk| pk.keypoint)
            .collect())
    }

    /// Detect keypoints and report on which side of the centre their arc lies
    pub(crate) fn detect_with_polarity(&self, img: &GrayF32Image) -> DetectResult<Vec<PolarKeypoint>> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Empty { width, height }.into());
        }

        let border = self.cfg.radius as usize;
        let (w, h) = (width as usize, height as usize);
        if w <= 2 * border || h <= 2 * border {
            debug!("Image {}x{} has no pixels outside the {}px border", w, h, border);
            return Ok(Vec::new());
        }

        let data = img.as_raw();
        let keypoints: Vec<PolarKeypoint> = (border..h - border)
            .into_par_iter()
            .flat_map_iter(|y| {
                let mut diffs = Vec::with_capacity(self.circle.offsets.len());
                let mut row = Vec::new();
                for x in border..w - border {
                    let centre = Point::new(x as i32, y as i32);

                    // Fast rejection on the diamond before the full circle
                    if !self.ring_passes(data, w, centre, &self.diamond, &mut diffs) {
                        continue;
                    }
                    self.sample_ring(data, w, centre, &self.circle, &mut diffs);
                    if let Some(polarity) =
                        arc_polarity(&diffs, self.cfg.pixel_threshold, self.circle.min_run)
                    {
                        row.push(PolarKeypoint { keypoint: centre, polarity });
                    }
                }
                row
            })
            .collect();

        debug!("Detected {} keypoints in {}x{} image", keypoints.len(), w, h);
        Ok(keypoints)
    }

    fn ring_passes(
        &self,
        data: &[f32],
        stride: usize,
        centre: Point,
        ring: &SamplingRing,
        diffs: &mut Vec<f32>,
    ) -> bool {
        self.sample_ring(data, stride, centre, ring, diffs);
        arc_polarity(diffs, self.cfg.pixel_threshold, ring.min_run).is_some()
    }

    /// Fill `diffs` with `ring - centre`; the caller guarantees the ring is inside the image
    #[inline]
    fn sample_ring(
        &self,
        data: &[f32],
        stride: usize,
        centre: Point,
        ring: &SamplingRing,
        diffs: &mut Vec<f32>,
    ) {
        let at = |p: Point| data[p.y as usize * stride + p.x as usize];
        let centre_value = at(centre);
        diffs.clear();
        diffs.extend(ring.offsets.iter().map(|&o| at(centre + o) - centre_value));
    }

    /// Get detector configuration
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Number of points on the full circle
    pub fn circle_len(&self) -> usize {
        self.circle.offsets.len()
    }
}
