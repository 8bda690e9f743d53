//! Logistic regression by iteratively reweighted least squares.
//!
//! Given:
//! - a model kind (which predictors enter the design)
//! - analysis records (0/1 response plus optional predictors)
//!
//! we:
//! - keep only the rows carrying every predictor of this model
//! - run IRLS from `μ = (y + 0.5) / 2`, solving one weighted least squares
//!   problem per iteration
//! - stop when the relative deviance change drops below the tolerance
//!
//! Separation is only declared when the iterations diverge: the deviance is
//! driven to zero, or saturated rows keep pushing the coefficients outward
//! when the cap is hit. A converged fit with a few saturated rows is fine.
//!
//! Degenerate inputs (single response class, perfect separation, rank-deficient
//! design, iteration cap reached) come back as [`ModelError`]s.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::domain::{AnalysisRecord, FittedModel, ModelKind};
use crate::error::ModelError;
use crate::math::{bernoulli_deviance, gram_inverse, inverse_logit, logit, solve_least_squares};
use crate::models::fill_design_row;

/// Fitted probabilities this close to 0 or 1 count as saturated.
const SATURATION_EPS: f64 = 10.0 * f64::EPSILON;

/// Lower bound on the IRLS weight `μ(1 − μ)`, so saturated rows stay solvable.
const WEIGHT_FLOOR: f64 = 1e-10;

/// A deviance this small means every row is fitted exactly: the data are separated.
const SEPARATION_DEVIANCE: f64 = 1e-6;

/// IRLS controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Iteration cap.
    pub max_iter: usize,
    /// Convergence threshold on `|dev - dev_old| / (|dev| + 0.1)`.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iter: 25,
            tolerance: 1e-8,
        }
    }
}

/// Design matrix and response for the rows usable by one model.
struct Design {
    x: DMatrix<f64>,
    y: DVector<f64>,
    n_excluded: usize,
}

/// Fit a single logistic model over the records it can use.
pub fn fit_model(
    model: ModelKind,
    records: &[AnalysisRecord],
    opts: &FitOptions,
) -> Result<FittedModel, ModelError> {
    let design = build_design(model, records)?;
    let p = model.coef_len();
    let n = design.y.len();

    let required = p + 1;
    if n < required {
        return Err(ModelError::InsufficientData {
            model,
            rows: n,
            required,
        });
    }

    let n_ones = design.y.iter().filter(|&&v| v == 1.0).count();
    if n_ones == 0 || n_ones == n {
        return Err(ModelError::DegenerateResponse {
            model,
            value: u8::from(n_ones == n),
        });
    }

    let x = &design.x;
    let y = &design.y;

    let mut mu = y.map(|v| (v + 0.5) / 2.0);
    let mut eta = mu.map(logit);
    let mut dev_old = deviance(y, &eta);
    let mut last_change = f64::INFINITY;
    let mut beta = DVector::<f64>::zeros(p);
    let mut growing = false;

    for iter in 1..=opts.max_iter {
        let (xw, zw) = weighted_system(x, y, &eta, &mu);
        let next = solve_least_squares(&xw, &zw).ok_or(ModelError::SingularDesign { model })?;
        growing = next.norm() > beta.norm();
        beta = next;

        eta = x * &beta;
        if eta.iter().any(|v| !v.is_finite()) {
            return Err(separation(model, iter, &beta));
        }
        mu = eta.map(inverse_logit);

        let dev = deviance(y, &eta);
        last_change = (dev - dev_old).abs() / (dev.abs() + 0.1);
        debug!(model = %model, iter, deviance = dev, change = last_change, "irls step");

        if last_change < opts.tolerance {
            if dev < SEPARATION_DEVIANCE {
                return Err(separation(model, iter, &beta));
            }
            return finish(model, &design, &beta, &mu, dev, iter);
        }
        dev_old = dev;
    }

    let saturated = mu.iter().any(|&m| m <= SATURATION_EPS || m >= 1.0 - SATURATION_EPS);
    if dev_old < SEPARATION_DEVIANCE || (saturated && growing) {
        return Err(separation(model, opts.max_iter, &beta));
    }

    Err(ModelError::NonConvergence {
        model,
        iterations: opts.max_iter,
        last_change,
    })
}

fn separation(model: ModelKind, iterations: usize, beta: &DVector<f64>) -> ModelError {
    ModelError::PerfectSeparation {
        model,
        iterations,
        estimate: beta.iter().copied().collect(),
    }
}

fn build_design(model: ModelKind, records: &[AnalysisRecord]) -> Result<Design, ModelError> {
    // A predictor with no usable value anywhere means the column itself is
    // missing; never fall back to a smaller model.
    for &predictor in model.predictors() {
        if !records.iter().any(|r| r.value(predictor).is_some()) {
            return Err(ModelError::MalformedRecord { model, predictor });
        }
    }

    let p = model.coef_len();
    let mut cells = Vec::with_capacity(records.len() * p);
    let mut y = Vec::with_capacity(records.len());
    let mut row = vec![0.0; p];

    for r in records {
        if fill_design_row(model, r, &mut row) {
            cells.extend_from_slice(&row);
            y.push(f64::from(r.response));
        }
    }

    let n = y.len();
    Ok(Design {
        x: DMatrix::from_row_slice(n, p, &cells),
        y: DVector::from_vec(y),
        n_excluded: records.len() - n,
    })
}

/// Build `(√W·X, √W·z)` for the working response `z = η + (y − μ) / (μ(1 − μ))`.
fn weighted_system(
    x: &DMatrix<f64>,
    y: &DVector<f64>,
    eta: &DVector<f64>,
    mu: &DVector<f64>,
) -> (DMatrix<f64>, DVector<f64>) {
    let (n, p) = x.shape();
    let mut xw = DMatrix::<f64>::zeros(n, p);
    let mut zw = DVector::<f64>::zeros(n);

    for i in 0..n {
        let w = irls_weight(mu[i]);
        let z = eta[i] + (y[i] - mu[i]) / w;
        let sw = w.sqrt();
        for j in 0..p {
            xw[(i, j)] = x[(i, j)] * sw;
        }
        zw[i] = z * sw;
    }

    (xw, zw)
}

fn irls_weight(mu: f64) -> f64 {
    (mu * (1.0 - mu)).max(WEIGHT_FLOOR)
}

fn deviance(y: &DVector<f64>, eta: &DVector<f64>) -> f64 {
    y.iter()
        .zip(eta.iter())
        .map(|(&yi, &ei)| bernoulli_deviance(yi, ei))
        .sum()
}

fn finish(
    model: ModelKind,
    design: &Design,
    beta: &DVector<f64>,
    mu: &DVector<f64>,
    dev: f64,
    iterations: usize,
) -> Result<FittedModel, ModelError> {
    let x = &design.x;
    let y = &design.y;
    let (n, p) = x.shape();

    // Covariance at the optimum: (XᵀWX)⁻¹ with W = μ(1 − μ).
    let mut xw = x.clone();
    for i in 0..n {
        let sw = irls_weight(mu[i]).sqrt();
        for j in 0..p {
            xw[(i, j)] *= sw;
        }
    }
    let cov = gram_inverse(&xw).ok_or(ModelError::SingularDesign { model })?;
    let std_errors = (0..p).map(|j| cov[(j, j)].max(0.0).sqrt()).collect();

    let y_bar = y.mean();
    let eta_null = logit(y_bar);
    let null_deviance = y.iter().map(|&yi| bernoulli_deviance(yi, eta_null)).sum();

    Ok(FittedModel {
        kind: model,
        coefficients: beta.iter().copied().collect(),
        std_errors,
        deviance: dev,
        null_deviance,
        aic: dev + 2.0 * p as f64,
        iterations,
        n_used: n,
        n_excluded: design.n_excluded,
    })
}
