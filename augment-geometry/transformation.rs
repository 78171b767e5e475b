use crate::error::{GeometryError, GeometryResult};
use crate::homography::{Builder, Evaluator, Homography, SanityChecker, MIN_BUILD_POINTS};
use augment_core::Point;
use image::Rgb32FImage;
use log::debug;

/// A projective mapping between two images, or the absence of one
///
/// A default transformation is invalid. It only becomes valid through a
/// successful [`Transformation::build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformation {
    matrix: Option<Homography>,
}

impl Transformation {
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Wrap an existing homography
    pub fn from_matrix(matrix: Homography) -> Self {
        Self { matrix: Some(matrix) }
    }

    /// Build from exactly four point pairs
    ///
    /// Any other count is an error. Degenerate or mirrored configurations
    /// give an invalid transformation.
    pub fn build(from: &[Point], to: &[Point]) -> GeometryResult<Self> {
        if from.len() != MIN_BUILD_POINTS || to.len() != MIN_BUILD_POINTS {
            return Err(GeometryError::WrongBuildPointCount {
                expected: MIN_BUILD_POINTS,
                from: from.len(),
                to: to.len(),
            });
        }
        if !SanityChecker::are_matches_sane(from, to) {
            return Ok(Self::invalid());
        }
        Ok(Self::from_matrix(Builder::build(from, to)))
    }

    pub fn is_valid(&self) -> bool {
        self.matrix.is_some()
    }

    pub fn matrix(&self) -> Option<&Homography> {
        self.matrix.as_ref()
    }

    /// Map points, or nothing at all when invalid
    pub fn apply(&self, points: &[Point]) -> Vec<Point> {
        match &self.matrix {
            Some(h) => Evaluator::apply_points(points, h),
            None => Vec::new(),
        }
    }

    /// Paint `replacement` over `target` through this mapping
    ///
    /// Returns a copy of `target` when invalid or when the replacement's
    /// corners would not land as a sane quadrilateral inside the target.
    pub fn augment(&self, target: &Rgb32FImage, replacement: &Rgb32FImage) -> Rgb32FImage {
        self.try_augment(target, replacement)
            .unwrap_or_else(|| target.clone())
    }

    /// Like [`Transformation::augment`], but `None` where it would fall back
    pub fn try_augment(&self, target: &Rgb32FImage, replacement: &Rgb32FImage) -> Option<Rgb32FImage> {
        let h = self.matrix.as_ref()?;

        let (w, h_px) = (replacement.width() as i32, replacement.height() as i32);
        let corners = [
            Point::new(0, 0),
            Point::new(w - 1, 0),
            Point::new(w - 1, h_px - 1),
            Point::new(0, h_px - 1),
        ];
        if !Evaluator::is_augmentation_sane(&corners, target.width(), target.height(), h) {
            debug!("Replacement corners do not map sanely into the target");
            return None;
        }

        Some(Evaluator::augment(target, replacement, h))
    }
}
