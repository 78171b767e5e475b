use crate::error::{DescriptorError, DescriptorResult};
use crate::model::{DescriptorModel, DescriptorModelAtAngle};
use augment_core::{Descriptor, GrayF32Image, ImageError};
use std::f32::consts::TAU;
use std::sync::Arc;

/// Steered binary descriptor of a single template-sized patch
#[derive(Debug, Clone)]
pub struct DescriptorExtractor {
    model: Arc<DescriptorModel>,
}

impl DescriptorExtractor {
    pub fn new(model: Arc<DescriptorModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &DescriptorModel {
        &self.model
    }

    pub fn template_size(&self) -> (u32, u32) {
        self.model.template_size()
    }

    /// Describe `patch`, which must match the model's template size exactly
    pub fn extract(&self, patch: &GrayF32Image) -> DescriptorResult<Descriptor> {
        self.validate_patch(patch)?;

        let angle = orientation(patch);
        let at_angle = self.model.bucket(self.select_bucket(angle));
        Ok(build_descriptor(patch, at_angle))
    }

    fn validate_patch(&self, patch: &GrayF32Image) -> DescriptorResult<()> {
        let (actual_width, actual_height) = patch.dimensions();
        if actual_width == 0 || actual_height == 0 {
            return Err(ImageError::Empty {
                width: actual_width,
                height: actual_height,
            }
            .into());
        }
        let (width, height) = self.template_size();
        if (actual_width, actual_height) != (width, height) {
            return Err(DescriptorError::WrongPatchSize {
                width,
                height,
                actual_width,
                actual_height,
            });
        }
        Ok(())
    }

    /// Quantize an angle in radians to the nearest bucket index
    pub fn select_bucket(&self, angle: f32) -> usize {
        let n = self.model.num_buckets();
        let mut choice = angle * n as f32 / TAU;
        if choice < 0.0 {
            choice += n as f32;
        }
        (choice.clamp(0.0, n as f32).round() as usize) % n
    }
}

/// Intensity-centroid orientation over the ellipse inscribed in the patch
///
/// The y axis points up, so the angle is counter-clockwise as seen on screen.
pub fn orientation(patch: &GrayF32Image) -> f32 {
    let cx = (patch.width() as f32 - 1.0) / 2.0;
    let cy = (patch.height() as f32 - 1.0) / 2.0;

    let mut m10 = 0.0f32;
    let mut m01 = 0.0f32;
    for (col, row, px) in patch.enumerate_pixels() {
        let dx = col as f32 - cx;
        let dy = cy - row as f32;
        // A zero half-axis gives NaN here, which drops the pixel
        if (dx * dx) / (cx * cx) + (dy * dy) / (cy * cy) <= 1.0 {
            m10 += dx * px[0];
            m01 += dy * px[0];
        }
    }

    m01.atan2(m10)
}

fn build_descriptor(patch: &GrayF32Image, at_angle: &DescriptorModelAtAngle) -> Descriptor {
    let at = |p: &augment_core::Point| patch.get_pixel(p.x as u32, p.y as u32)[0];
    let mut d = Descriptor::ZERO;
    for (i, (p1, p2)) in at_angle.points1.iter().zip(&at_angle.points2).enumerate() {
        if at(p1) > at(p2) {
            d.set(i);
        }
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ModelGenerator;
    use image::{ImageBuffer, Luma};
    use std::f32::consts::{FRAC_PI_2, PI};

    fn extractor(buckets: usize) -> DescriptorExtractor {
        let model = ModelGenerator::new(13, 13, buckets, 5).unwrap().generate().unwrap();
        DescriptorExtractor::new(Arc::new(model))
    }

    #[test]
    fn test_zero_patch() {
        let ex = extractor(48);
        let d = ex.extract(&GrayF32Image::new(13, 13)).unwrap();
        // No pair can compare strictly greater on a constant patch
        assert_eq!(d, Descriptor::ZERO);
    }

    #[test]
    fn test_wrong_sizes() {
        let ex = extractor(48);
        for dw in -2i32..2 {
            for dh in -2i32..2 {
                if dw == 0 && dh == 0 {
                    continue;
                }
                let patch = GrayF32Image::new((13 + dw) as u32, (13 + dh) as u32);
                assert!(matches!(ex.extract(&patch), Err(DescriptorError::WrongPatchSize { .. })));
            }
        }
        assert!(matches!(
            ex.extract(&GrayF32Image::new(0, 13)),
            Err(DescriptorError::Image(ImageError::Empty { .. }))
        ));
    }

    #[test]
    fn test_orientation_of_gradients() {
        let right: GrayF32Image = ImageBuffer::from_fn(13, 13, |x, _| Luma([x as f32 / 12.0]));
        assert!(orientation(&right).abs() < 1e-4);

        // Brighter towards the top of the image is +90 degrees
        let up: GrayF32Image = ImageBuffer::from_fn(13, 13, |_, y| Luma([1.0 - y as f32 / 12.0]));
        assert!((orientation(&up) - FRAC_PI_2).abs() < 1e-4);

        let left: GrayF32Image = ImageBuffer::from_fn(13, 13, |x, _| Luma([1.0 - x as f32 / 12.0]));
        assert!((orientation(&left).abs() - PI).abs() < 1e-4);
    }

    #[test]
    fn test_bucket_selection() {
        let ex = extractor(4);
        assert_eq!(ex.select_bucket(0.0), 0);
        assert_eq!(ex.select_bucket(FRAC_PI_2), 1);
        assert_eq!(ex.select_bucket(PI), 2);
        assert_eq!(ex.select_bucket(-FRAC_PI_2), 3);
        // Just below zero wraps around to bucket 0
        assert_eq!(ex.select_bucket(-0.01), 0);
        assert_eq!(ex.select_bucket(0.3), 0);
    }

    #[test]
    fn test_single_bucket() {
        let ex = extractor(1);
        for angle in [-3.0f32, -1.0, 0.0, 1.0, 3.0] {
            assert_eq!(ex.select_bucket(angle), 0);
        }
    }

    #[test]
    fn test_bits_follow_pixel_order() {
        let ex = extractor(48);
        let patch: GrayF32Image = ImageBuffer::from_fn(13, 13, |x, y| Luma([(x * 13 + y) as f32 / 169.0]));
        let d = ex.extract(&patch).unwrap();
        let bucket = ex.model().bucket(ex.select_bucket(orientation(&patch)));
        for i in 0..augment_core::DESCRIPTOR_BITS {
            let (p1, p2) = (bucket.points1[i], bucket.points2[i]);
            let expected = patch.get_pixel(p1.x as u32, p1.y as u32)[0] > patch.get_pixel(p2.x as u32, p2.y as u32)[0];
            assert_eq!(d.get(i), expected);
        }
    }
}
