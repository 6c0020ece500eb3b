//! Minimum-norm linear least squares via SVD.

use nalgebra::{DMatrix, DVector, SVD};

/// Iteration cap for the SVD; generous for the handful of columns a surface fit has.
const MAX_SVD_ITERATIONS: usize = 10_000;

#[derive(Debug, Clone)]
pub(crate) struct LeastSquaresSolution {
    pub coefficients: Vec<f64>,
    /// Number of singular values above the cutoff.
    pub rank: usize,
}

/// Solves `min ‖A·c − b‖` returning the minimum-norm `c`.
///
/// Singular values at or below `ε · max(m, n) · σ_max` are treated as zero, so
/// rank-deficient and underdetermined systems return the minimum-norm answer instead
/// of failing. The matrix is decomposed as given: rescaling its columns would change
/// which of the exact solutions has the smallest norm.
///
/// Returns `None` only if the SVD does not converge.
pub(crate) fn solve_min_norm(a: DMatrix<f64>, b: &DVector<f64>) -> Option<LeastSquaresSolution> {
    let (nrows, ncols) = a.shape();

    let svd = SVD::try_new(a, true, true, f64::EPSILON, MAX_SVD_ITERATIONS)?;

    let sigma_max = svd.singular_values.max();
    let cutoff = f64::EPSILON * nrows.max(ncols) as f64 * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > cutoff).count();

    let solution = svd.solve(b, cutoff).ok()?;

    Some(LeastSquaresSolution {
        coefficients: solution.iter().copied().collect(),
        rank,
    })
}
