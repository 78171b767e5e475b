use augment_core::Point;

/// Discrete circle rings built with the midpoint circle algorithm
pub struct CircleBuilder;

impl CircleBuilder {
    /// Lattice points of a circle of `radius`, ordered by angle and not closed
    ///
    /// The ring starts at `(radius, 0)` and walks towards negative `y`.
    pub fn build(radius: u32) -> Vec<Point> {
        let octant = Self::build_octant(radius);
        Self::circle_from_octant(octant)
    }

    fn build_octant(radius: u32) -> Vec<Point> {
        let mut current = Point::new(radius as i32, 0);
        let mut octant = Vec::new();

        while current.x >= -current.y {
            octant.push(current);
            let decrement_x = Self::should_decrement_x(current, radius);
            current.y -= 1;
            if decrement_x {
                current.x -= 1;
            }
        }

        octant
    }

    #[inline]
    fn should_decrement_x(p: Point, radius: u32) -> bool {
        let (x, y, r) = (p.x as i64, p.y as i64, radius as i64);
        let error_diff = 2 * ((x * x + y * y - r * r) + (-2 * y + 1)) + (1 - 2 * x);
        error_diff > 0
    }

    fn circle_from_octant(octant: Vec<Point>) -> Vec<Point> {
        // octant -> quadrant -> half circle -> circle
        let mirrors: [fn(Point) -> Point; 3] = [
            |p| Point::new(-p.y, -p.x),
            |p| Point::new(-p.x, p.y),
            |p| Point::new(p.x, -p.y),
        ];

        let mut points = octant;
        for mirror in mirrors {
            let mirrored: Vec<Point> = points.iter().rev().map(|&p| mirror(p)).collect();
            points.extend(mirrored);
        }

        points.dedup();
        if points.len() > 1 {
            points.pop();
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn test_small_radii() {
        assert_eq!(CircleBuilder::build(0), pts(&[(0, 0)]));
        assert_eq!(CircleBuilder::build(1), pts(&[(1, 0), (0, -1), (-1, 0), (0, 1)]));
        assert_eq!(
            CircleBuilder::build(2),
            pts(&[
                (2, 0), (2, -1), (1, -2),
                (0, -2), (-1, -2), (-2, -1),
                (-2, 0), (-2, 1), (-1, 2),
                (0, 2), (1, 2), (2, 1),
            ])
        );
        assert_eq!(
            CircleBuilder::build(3),
            pts(&[
                (3, 0), (3, -1), (2, -2), (1, -3),
                (0, -3), (-1, -3), (-2, -2), (-3, -1),
                (-3, 0), (-3, 1), (-2, 2), (-1, 3),
                (0, 3), (1, 3), (2, 2), (3, 1),
            ])
        );
    }

    #[test]
    fn test_no_duplicates() {
        for r in 0..20 {
            let ring = CircleBuilder::build(r);
            let unique: std::collections::HashSet<_> = ring.iter().collect();
            assert_eq!(unique.len(), ring.len(), "radius {}", r);
        }
    }

    proptest! {
        #[test]
        fn prop_ring_symmetric(r in 1u32..40) {
            let ring = CircleBuilder::build(r);
            let set: std::collections::HashSet<_> = ring.iter().copied().collect();
            prop_assert_eq!(ring.len() % 4, 0);
            for p in &ring {
                prop_assert!(set.contains(&Point::new(-p.y, p.x)));
                prop_assert!(set.contains(&Point::new(p.x, -p.y)));
                prop_assert!(set.contains(&Point::new(-p.x, p.y)));
            }
        }

        #[test]
        fn prop_ring_is_connected(r in 1u32..40) {
            let ring = CircleBuilder::build(r);
            for (i, a) in ring.iter().enumerate() {
                let b = ring[(i + 1) % ring.len()];
                prop_assert!((a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1);
            }
        }
    }
}
