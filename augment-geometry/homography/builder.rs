use super::{Homography, MIN_BUILD_POINTS};
use augment_core::Point;
use nalgebra::{DMatrix, Matrix3, SymmetricEigen};

/// Direct linear transform from exactly four point pairs
pub struct Builder;

impl Builder {
    /// Homography mapping `from` onto `to`
    ///
    /// Both sets are Hartley-normalised before the 8x9 system is formed. The
    /// solution is the eigenvector of `AᵀA` with the smallest eigenvalue,
    /// denormalised and scaled so that `H[2,2] = 1` where that is possible.
    /// Callers are expected to have run the sanity checks first.
    pub fn build(from: &[Point], to: &[Point]) -> Homography {
        debug_assert_eq!(from.len(), MIN_BUILD_POINTS);
        debug_assert_eq!(to.len(), MIN_BUILD_POINTS);

        let (t_from, from_n) = normalize_points(from);
        let (t_to, to_n) = normalize_points(to);
        let a = build_a(&from_n, &to_n);

        let eig = SymmetricEigen::new(a.transpose() * &a);
        let min_idx = eig
            .eigenvalues
            .iter()
            .enumerate()
            .min_by(|x, y| x.1.abs().total_cmp(&y.1.abs()))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let h = eig.eigenvectors.column(min_idx);
        let h_norm = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], h[8]);

        // t_to is a similarity with non-zero scale, so its inverse always exists
        let t_to_inv = t_to.try_inverse().unwrap_or_else(Matrix3::identity);
        let homography = t_to_inv * h_norm * t_from;

        let scale = homography[(2, 2)];
        if scale.abs() > 1e-12 {
            homography / scale
        } else {
            homography
        }
    }
}

/// Translate the centroid to the origin and scale the mean distance to √2
fn normalize_points(points: &[Point]) -> (Matrix3<f64>, Vec<[f64; 2]>) {
    let n = points.len() as f64;
    let cx = points.iter().map(|p| p.x as f64).sum::<f64>() / n;
    let cy = points.iter().map(|p| p.y as f64).sum::<f64>() / n;
    let mean_dist = points
        .iter()
        .map(|p| ((p.x as f64 - cx).powi(2) + (p.y as f64 - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;
    let s = if mean_dist > 1e-15 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };

    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);
    let normalized = points
        .iter()
        .map(|p| [s * (p.x as f64 - cx), s * (p.y as f64 - cy)])
        .collect();
    (t, normalized)
}

fn build_a(from: &[[f64; 2]], to: &[[f64; 2]]) -> DMatrix<f64> {
    let mut a = DMatrix::zeros(2 * from.len(), 9);
    for (i, (f, t)) in from.iter().zip(to).enumerate() {
        let (x, y) = (f[0], f[1]);
        let (xp, yp) = (t[0], t[1]);

        a[(2 * i, 3)] = -x;
        a[(2 * i, 4)] = -y;
        a[(2 * i, 5)] = -1.0;
        a[(2 * i, 6)] = x * yp;
        a[(2 * i, 7)] = y * yp;
        a[(2 * i, 8)] = yp;

        a[(2 * i + 1, 0)] = x;
        a[(2 * i + 1, 1)] = y;
        a[(2 * i + 1, 2)] = 1.0;
        a[(2 * i + 1, 6)] = -x * xp;
        a[(2 * i + 1, 7)] = -y * xp;
        a[(2 * i + 1, 8)] = -xp;
    }
    a
}
