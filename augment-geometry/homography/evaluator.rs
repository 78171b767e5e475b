use super::{Homography, SanityChecker};
use augment_core::Point;
use image::{Rgb, Rgb32FImage};
use log::debug;
use nalgebra::Vector3;
use rayon::prelude::*;

/// Marks warped samples that fell outside the replacement, below the [0, 1] range
pub const SENTINEL: f32 = -1.0;

const EDGE_TOLERANCE: f64 = 1e-6;

/// Applies a homography to points and images
pub struct Evaluator;

impl Evaluator {
    /// Map points through `h`, dividing by the third coordinate and rounding
    pub fn apply_points(points: &[Point], h: &Homography) -> Vec<Point> {
        points
            .iter()
            .map(|p| {
                let q = h * Vector3::new(p.x as f64, p.y as f64, 1.0);
                let scale = 1.0 / q.z;
                Point::new((q.x * scale).round() as i32, (q.y * scale).round() as i32)
            })
            .collect()
    }

    /// Whether mapping `corners` keeps them a sane quadrilateral inside a
    /// `target_width` x `target_height` image
    pub fn is_augmentation_sane(corners: &[Point], target_width: u32, target_height: u32, h: &Homography) -> bool {
        let mapped = Self::apply_points(corners, h);
        if !SanityChecker::are_matches_sane(corners, &mapped) {
            return false;
        }
        mapped
            .iter()
            .all(|p| p.x >= 0 && p.y >= 0 && (p.x as i64) < target_width as i64 && (p.y as i64) < target_height as i64)
    }

    /// Warp `replacement` into the geometry of `target` and fill the rest from `target`
    ///
    /// Every target pixel is pulled back through `h⁻¹` and sampled bilinearly.
    /// Channels left at [`SENTINEL`] take the target value.
    pub fn augment(target: &Rgb32FImage, replacement: &Rgb32FImage, h: &Homography) -> Rgb32FImage {
        let (width, height) = target.dimensions();
        if width == 0 || height == 0 || replacement.width() == 0 || replacement.height() == 0 {
            return target.clone();
        }
        let Some(h_inv) = h.try_inverse() else {
            debug!("Homography is singular, leaving target untouched");
            return target.clone();
        };

        let stride = width as usize * 3;
        let mut buf = vec![0.0f32; stride * height as usize];

        buf.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
            for x in 0..width as usize {
                let q = h_inv * Vector3::new(x as f64, y as f64, 1.0);
                let warped = Self::sample(replacement, q.x / q.z, q.y / q.z);
                let original = target.get_pixel(x as u32, y as u32);
                for c in 0..3 {
                    row[x * 3 + c] = if warped[c] == SENTINEL { original[c] } else { warped[c] };
                }
            }
        });

        Rgb32FImage::from_raw(width, height, buf).unwrap_or_else(|| target.clone())
    }

    /// Bilinear sample at a subpixel position, [`SENTINEL`] outside the image
    fn sample(img: &Rgb32FImage, x: f64, y: f64) -> [f32; 3] {
        let (w, h) = img.dimensions();
        let (max_x, max_y) = (w as f64 - 1.0, h as f64 - 1.0);
        if !(x >= -EDGE_TOLERANCE && y >= -EDGE_TOLERANCE && x <= max_x + EDGE_TOLERANCE && y <= max_y + EDGE_TOLERANCE) {
            return [SENTINEL; 3];
        }

        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);
        let (x0, y0) = (x.floor() as u32, y.floor() as u32);
        let (x1, y1) = ((x0 + 1).min(w - 1), (y0 + 1).min(h - 1));
        let dx = (x - x0 as f64) as f32;
        let dy = (y - y0 as f64) as f32;

        let Rgb(p00) = *img.get_pixel(x0, y0);
        let Rgb(p10) = *img.get_pixel(x1, y0);
        let Rgb(p01) = *img.get_pixel(x0, y1);
        let Rgb(p11) = *img.get_pixel(x1, y1);

        let mut out = [0.0f32; 3];
        for c in 0..3 {
            let top = p00[c] * (1.0 - dx) + p10[c] * dx;
            let bottom = p01[c] * (1.0 - dx) + p11[c] * dx;
            out[c] = top * (1.0 - dy) + bottom * dy;
        }
        out
    }
}
