use super::MIN_BUILD_POINTS;
use augment_core::Point;

/// Rejects point configurations a homography should not be built from
pub struct SanityChecker;

impl SanityChecker {
    /// Both quadruples are non-degenerate and wind around their centroids in the same order
    pub fn are_matches_sane(from: &[Point], to: &[Point]) -> bool {
        if from.len() != MIN_BUILD_POINTS || to.len() != MIN_BUILD_POINTS {
            return false;
        }
        if Self::is_degenerate(from) || Self::is_degenerate(to) {
            return false;
        }
        Self::orientation_descriptor(from) == Self::orientation_descriptor(to)
    }

    /// Whether any three of the points are collinear (coincident points included)
    pub fn is_degenerate(points: &[Point]) -> bool {
        (0..points.len()).any(|skip| {
            let triple: Vec<Point> = points
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &p)| p)
                .collect();
            triple.len() == 3 && Self::are_collinear(triple[0], triple[1], triple[2])
        })
    }

    /// Twice the signed triangle area is zero
    #[inline]
    pub fn are_collinear(a: Point, b: Point, c: Point) -> bool {
        let (ax, ay) = (a.x as i64, a.y as i64);
        let (bx, by) = (b.x as i64, b.y as i64);
        let (cx, cy) = (c.x as i64, c.y as i64);
        let area2 = (ax * by + bx * cy + cx * ay) - (ax * cy + bx * ay + cx * by);
        area2 == 0
    }

    /// Point indices in angular order about the centroid, rotated to start at index 0
    pub fn orientation_descriptor(points: &[Point]) -> Vec<usize> {
        let n = points.len() as f32;
        let mx = points.iter().map(|p| p.x as f32).sum::<f32>() / n;
        let my = points.iter().map(|p| p.y as f32).sum::<f32>() / n;
        let angles: Vec<f32> = points
            .iter()
            .map(|p| (p.y as f32 - my).atan2(p.x as f32 - mx))
            .collect();

        let mut indices: Vec<usize> = (0..points.len()).collect();
        indices.sort_by(|&a, &b| angles[a].total_cmp(&angles[b]));
        if let Some(anchor) = indices.iter().position(|&i| i == 0) {
            indices.rotate_left(anchor);
        }
        indices
    }
}
