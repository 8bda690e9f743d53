//! Weighted least squares solver.
//!
//! Every IRLS step of the logistic fit is a small linear regression of the form:
//!
//! ```text
//! minimize Σ w_i (z_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - The caller scales rows by `sqrt(w_i)`; we solve the resulting ordinary
//!   least squares problem.
//! - We use SVD so tall design matrices (more rows than columns) are handled
//!   directly. Nalgebra's `QR::solve` is intended for square systems.
//! - A rank check runs first: a rank-deficient design (e.g. a constant
//!   predictor) has no unique solution and is reported instead of returning
//!   SVD's minimum-norm answer.

use nalgebra::{DMatrix, DVector};

/// Relative singular value threshold for the rank check.
const RANK_EPS: f64 = 1e-10;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the design is rank deficient or the solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() < x.ncols() || x.nrows() != y.len() {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let s_max = svd.singular_values.max();
    if !(s_max.is_finite() && s_max > 0.0) {
        return None;
    }
    if svd.rank(s_max * RANK_EPS) < x.ncols() {
        return None;
    }

    let beta = svd.solve(y, s_max * RANK_EPS).ok()?;
    beta.iter().all(|v| v.is_finite()).then_some(beta)
}

/// Invert `XᵀX` for an already-weighted design (`X = √W · X₀`).
///
/// At IRLS convergence this is the asymptotic covariance of the coefficients.
pub fn gram_inverse(x: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let gram = x.transpose() * x;
    gram.try_inverse()
}
