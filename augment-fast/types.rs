use augment_core::{Keypoint, Point};

/// Which side of the centre value the contiguous arc lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    /// Ring pixels brighter than the centre
    Brighter,
    /// Ring pixels darker than the centre
    Darker,
}

/// Detected keypoint together with the polarity of its arc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PolarKeypoint {
    pub keypoint: Keypoint,
    pub polarity: Polarity,
}

/// Ring of offsets around a candidate pixel plus the run it has to produce
#[derive(Debug, Clone)]
pub(crate) struct SamplingRing {
    pub offsets: Vec<Point>,
    pub min_run: usize,
}

impl SamplingRing {
    /// Four-point diamond at `radius`
    pub fn diamond(radius: i32, min_run: usize) -> Self {
        Self {
            offsets: vec![
                Point::new(radius, 0),
                Point::new(0, -radius),
                Point::new(-radius, 0),
                Point::new(0, radius),
            ],
            min_run,
        }
    }
}
