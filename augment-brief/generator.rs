use crate::error::{DescriptorError, DescriptorResult};
use crate::model::{DescriptorModel, DescriptorModelAtAngle};
use augment_core::{Point, DESCRIPTOR_BITS};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::{FRAC_1_SQRT_2, TAU};

/// Square region `(x, y, side)` of a template whose every rotation about the
/// template centre stays inside the template
pub fn sampling_region(template_width: u32, template_height: u32) -> (i32, i32, i32) {
    let x_radius = (template_width as i32 - 1) / 2;
    let y_radius = (template_height as i32 - 1) / 2;
    let radius = (FRAC_1_SQRT_2 * x_radius.min(y_radius) as f32).floor() as i32;
    (x_radius - radius, y_radius - radius, 2 * radius + 1)
}

/// Random sampling-pair model generator
///
/// One base set of pairs is drawn and then rotated rigidly to every bucket
/// angle, so bucket `k` samples the patch as seen at `2πk/B` radians.
pub struct ModelGenerator {
    template_width: u32,
    template_height: u32,
    num_buckets: usize,
    rng: StdRng,
}

impl ModelGenerator {
    pub const DEFAULT_TEMPLATE_SIDE: u32 = 13;
    pub const DEFAULT_BUCKETS: usize = 48;

    pub fn new(
        template_width: u32,
        template_height: u32,
        num_buckets: usize,
        seed: u64,
    ) -> DescriptorResult<Self> {
        let max_side = i32::MAX as u32;
        let side_ok = |side: u32| side > 0 && side <= max_side;
        if !side_ok(template_width) || !side_ok(template_height) {
            return Err(DescriptorError::InvalidTemplateSize {
                width: template_width as i64,
                height: template_height as i64,
            });
        }
        if num_buckets == 0 {
            return Err(DescriptorError::NoBuckets);
        }
        Ok(Self {
            template_width,
            template_height,
            num_buckets,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Draw a new base set and rotate it into every bucket
    pub fn generate(&mut self) -> DescriptorResult<DescriptorModel> {
        let base = DescriptorModelAtAngle {
            points1: self.random_points(),
            points2: self.random_points(),
        };

        let buckets = (0..self.num_buckets)
            .map(|k| {
                let angle = TAU * (k as f32 / self.num_buckets as f32);
                self.rotate_model(&base, angle)
            })
            .collect();

        debug!(
            "Generated {}x{} model with {} buckets",
            self.template_width, self.template_height, self.num_buckets
        );
        DescriptorModel::new(self.template_width, self.template_height, buckets)
    }

    fn random_points(&mut self) -> Vec<Point> {
        let (x0, y0, side) = sampling_region(self.template_width, self.template_height);
        (0..DESCRIPTOR_BITS)
            .map(|_| {
                let x = self.rng.gen_range(x0..x0 + side);
                let y = self.rng.gen_range(y0..y0 + side);
                Point::new(x, y)
            })
            .collect()
    }

    fn rotate_model(&self, base: &DescriptorModelAtAngle, angle: f32) -> DescriptorModelAtAngle {
        DescriptorModelAtAngle {
            points1: base.points1.iter().map(|&p| self.rotate_point(p, angle)).collect(),
            points2: base.points2.iter().map(|&p| self.rotate_point(p, angle)).collect(),
        }
    }

    /// Rotate about the template centre in a y-up frame, then round and clamp
    fn rotate_point(&self, p: Point, angle: f32) -> Point {
        let cx = (self.template_width as f32 - 1.0) / 2.0;
        let cy = (self.template_height as f32 - 1.0) / 2.0;
        let (x, y) = (p.x as f32 - cx, cy - p.y as f32);
        let (s, c) = angle.sin_cos();
        let (rx, ry) = (x * c - y * s, x * s + y * c);

        let px = (rx + cx).round() as i32;
        let py = (cy - ry).round() as i32;
        Point::new(
            px.clamp(0, self.template_width as i32 - 1),
            py.clamp(0, self.template_height as i32 - 1),
        )
    }
}
