pub mod config;
pub mod error;
pub mod frame;

pub use config::{AugmentConfig, DetectorConfig, RansacConfig};
pub use error::{ConfigError, ImageError, ImageResult};
pub use frame::{Frame, FrameKind, GrayF32Image};

/// Number of bits in a binary descriptor
pub const DESCRIPTOR_BITS: usize = 128;

/// Integer pixel coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = (self.x as i64 - other.x as i64) as f32;
        let dy = (self.y as i64 - other.y as i64) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Corner pixel, no orientation or scale attached
pub type Keypoint = Point;

/// 128-bit binary descriptor, bit `i` is bit `i` of the integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Descriptor(pub u128);

impl Descriptor {
    pub const ZERO: Descriptor = Descriptor(0);
    pub const ONES: Descriptor = Descriptor(u128::MAX);

    #[inline]
    pub fn set(&mut self, bit: usize) {
        debug_assert!(bit < DESCRIPTOR_BITS);
        self.0 |= 1u128 << bit;
    }

    #[inline]
    pub fn get(&self, bit: usize) -> bool {
        (self.0 >> bit) & 1 == 1
    }

    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.0.count_ones()
    }
}

/// Candidate match between a source keypoint index and a target keypoint index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Correspondence {
    pub source: usize,
    pub target: usize,
}

impl Correspondence {
    pub const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

/// At most one entry per source index, ordered by source index
pub type Correspondences = Vec<Correspondence>;

/// Build a Rayon thread pool with the specified number of threads
///
/// A count of zero lets Rayon pick one thread per logical core.
pub fn build_thread_pool(n_threads: usize) -> Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("augment-worker-{}", i))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_low_bits(n: usize) -> Descriptor {
        match n {
            0 => Descriptor::ZERO,
            n if n >= DESCRIPTOR_BITS => Descriptor::ONES,
            n => Descriptor((1u128 << n) - 1),
        }
    }

    #[test]
    fn test_descriptor_bits() {
        let mut d = Descriptor::ZERO;
        d.set(0);
        d.set(127);
        assert!(d.get(0));
        assert!(d.get(127));
        assert!(!d.get(64));
        assert_eq!(d.count_ones(), 2);
    }

    #[test]
    fn test_low_bits() {
        assert_eq!(with_low_bits(0), Descriptor::ZERO);
        assert_eq!(with_low_bits(128), Descriptor::ONES);
        assert_eq!(with_low_bits(5).count_ones(), 5);
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0, 0);
        let b = Point::new(3, 4);
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a + b, b);
    }

    proptest::proptest! {
        #[test]
        fn prop_distance_symmetric(ax in -1000i32..1000, ay in -1000i32..1000, bx in -1000i32..1000, by in -1000i32..1000) {
            let a = Point::new(ax, ay);
            let b = Point::new(bx, by);
            proptest::prop_assert_eq!(a.distance(&b), b.distance(&a));
            proptest::prop_assert!(a.distance(&b) >= 0.0);
        }

        #[test]
        fn prop_low_bits_count(n in 0usize..200) {
            proptest::prop_assert_eq!(with_low_bits(n).count_ones() as usize, n.min(DESCRIPTOR_BITS));
        }
    }

    #[test]
    fn test_thread_pool() {
        let pool = build_thread_pool(2).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }
}
