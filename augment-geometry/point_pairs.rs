use crate::error::{GeometryError, GeometryResult};
use augment_core::{Correspondence, Point};

/// Index-aligned lists of matching points, `from[i]` corresponds to `to[i]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointPairs {
    from: Vec<Point>,
    to: Vec<Point>,
}

impl PointPairs {
    pub fn new(from: Vec<Point>, to: Vec<Point>) -> GeometryResult<Self> {
        if from.len() != to.len() {
            return Err(GeometryError::LengthMismatch {
                from: from.len(),
                to: to.len(),
            });
        }
        Ok(Self { from, to })
    }

    /// Resolve correspondences into point pairs; any index out of range is an error
    pub fn from_correspondences(
        source_keypoints: &[Point],
        target_keypoints: &[Point],
        correspondences: &[Correspondence],
    ) -> GeometryResult<Self> {
        let mut from = Vec::with_capacity(correspondences.len());
        let mut to = Vec::with_capacity(correspondences.len());
        for c in correspondences {
            match (source_keypoints.get(c.source), target_keypoints.get(c.target)) {
                (Some(&s), Some(&t)) => {
                    from.push(s);
                    to.push(t);
                }
                _ => {
                    return Err(GeometryError::CorrespondenceOutOfRange {
                        source_index: c.source,
                        target_index: c.target,
                        source_len: source_keypoints.len(),
                        target_len: target_keypoints.len(),
                    })
                }
            }
        }
        Ok(Self { from, to })
    }

    pub fn from_points(&self) -> &[Point] {
        &self.from
    }

    pub fn to_points(&self) -> &[Point] {
        &self.to
    }

    pub fn len(&self) -> usize {
        self.from.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.from.iter().copied().zip(self.to.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<Point> {
        raw.iter().copied().map(Point::from).collect()
    }

    fn corrs(raw: &[(usize, usize)]) -> Vec<Correspondence> {
        raw.iter().map(|&(s, t)| Correspondence::new(s, t)).collect()
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(
            PointPairs::new(pts(&[(0, 0)]), vec![]),
            Err(GeometryError::LengthMismatch { from: 1, to: 0 })
        ));
        assert!(PointPairs::new(vec![], pts(&[(0, 0)])).is_err());
    }

    #[test]
    fn test_valid_inputs() {
        assert!(PointPairs::new(vec![], vec![]).unwrap().is_empty());
        assert_eq!(PointPairs::new(pts(&[(0, 0)]), pts(&[(0, 0)])).unwrap().len(), 1);
    }

    #[test]
    fn test_correspondences_out_of_range() {
        let kp1 = pts(&[(0, 0), (0, 1)]);
        let kp2 = pts(&[(0, 0)]);
        for bad in [corrs(&[(0, 1)]), corrs(&[(0, 0), (1, 0), (0, 1)]), corrs(&[(1, 1)])] {
            assert!(matches!(
                PointPairs::from_correspondences(&kp1, &kp2, &bad),
                Err(GeometryError::CorrespondenceOutOfRange { .. })
            ));
        }
        assert!(PointPairs::from_correspondences(&kp1, &kp2, &corrs(&[(2, 0)])).is_err());
    }

    #[test]
    fn test_correspondences_in_range() {
        let kp1 = pts(&[(0, 0), (0, 1)]);
        let kp2 = pts(&[(0, 0)]);
        for good in [
            corrs(&[]),
            corrs(&[(0, 0)]),
            corrs(&[(1, 0)]),
            corrs(&[(0, 0), (1, 0)]),
            corrs(&[(1, 0), (0, 0)]),
        ] {
            assert!(PointPairs::from_correspondences(&kp1, &kp2, &good).is_ok());
        }

        let pairs = PointPairs::from_correspondences(&kp1, &kp2, &corrs(&[(1, 0), (0, 0)])).unwrap();
        assert_eq!(pairs.from_points(), &pts(&[(0, 1), (0, 0)])[..]);
        assert_eq!(pairs.to_points(), &pts(&[(0, 0), (0, 0)])[..]);
        assert_eq!(pairs.iter().count(), 2);
    }
}
