//! Model evaluation for the V / S / C logistic models.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given record (for IRLS)
//! - predict the whiff probability given coefficients (for reports/plots)
//!
//! Both are generic over [`ModelKind::predictors`], intercept first.

use crate::domain::{AnalysisRecord, FittedModel, ModelKind, Predictor, ProbabilityGrid};
use crate::math::inverse_logit;

/// Number of points in a saved probability grid.
pub const GRID_POINTS: usize = 101;

/// Fill a design row for the given model kind.
///
/// The row includes the constant term first (intercept). Returns `false`, leaving
/// `out` partially written, when any predictor of the model is missing on `record`.
///
/// # Panics
/// Panics if `out` is shorter than `model.coef_len()`.
pub fn fill_design_row(model: ModelKind, record: &AnalysisRecord, out: &mut [f64]) -> bool {
    out[0] = 1.0;
    for (slot, &predictor) in out[1..].iter_mut().zip(model.predictors()) {
        match record.value(predictor) {
            Some(v) => *slot = v,
            None => return false,
        }
    }
    true
}

/// Linear predictor `η = β0 + Σ βᵢ·xᵢ` for predictor values `xs` (no intercept entry).
pub fn linear_predictor(coefficients: &[f64], xs: &[f64]) -> f64 {
    coefficients[0]
        + coefficients[1..]
            .iter()
            .zip(xs)
            .map(|(b, x)| b * x)
            .sum::<f64>()
}

/// Predicted whiff probability at predictor values `xs`.
pub fn predict_at(coefficients: &[f64], xs: &[f64]) -> f64 {
    inverse_logit(linear_predictor(coefficients, xs))
}

/// Predicted whiff probability for a record, or `None` when a predictor is missing.
pub fn predict_probability(
    model: ModelKind,
    coefficients: &[f64],
    record: &AnalysisRecord,
) -> Option<f64> {
    let xs: Option<Vec<f64>> = model
        .predictors()
        .iter()
        .map(|&p| record.value(p))
        .collect();
    Some(predict_at(coefficients, &xs?))
}

/// Observed `[min, max]` of a predictor over the records, widened when flat.
pub fn observed_range(records: &[AnalysisRecord], predictor: Predictor) -> Option<(f64, f64)> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for x in records.iter().filter_map(|r| r.value(predictor)) {
        lo = lo.min(x);
        hi = hi.max(x);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return None;
    }
    if hi > lo { Some((lo, hi)) } else { Some((lo - 0.5, hi + 0.5)) }
}

/// Sample a univariate model's probability curve at `n` evenly spaced points.
///
/// Returns `None` for a multi-predictor model.
pub fn probability_grid(model: &FittedModel, x_min: f64, x_max: f64, n: usize) -> Option<ProbabilityGrid> {
    let predictor = model.kind.univariate_predictor()?;
    let n = n.max(2);

    let x: Vec<f64> = (0..n)
        .map(|i| x_min + (x_max - x_min) * i as f64 / (n as f64 - 1.0))
        .collect();
    let p = x.iter().map(|&v| predict_at(&model.coefficients, &[v])).collect();

    Some(ProbabilityGrid {
        kind: model.kind,
        predictor,
        x,
        p,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_row_puts_intercept_first() {
        let r = AnalysisRecord::new(true, Some(95.0), Some(2400.0));
        let mut row = [0.0; 3];
        assert!(fill_design_row(ModelKind::Combined, &r, &mut row));
        assert_eq!(row, [1.0, 95.0, 2400.0]);

        let mut row = [0.0; 2];
        assert!(fill_design_row(ModelKind::Spin, &r, &mut row));
        assert_eq!(row, [1.0, 2400.0]);
    }

    #[test]
    fn design_row_reports_missing_predictor() {
        let r = AnalysisRecord::new(false, Some(92.0), None);
        let mut row = [0.0; 3];
        assert!(!fill_design_row(ModelKind::Combined, &r, &mut row));
        let mut row = [0.0; 2];
        assert!(fill_design_row(ModelKind::Velocity, &r, &mut row));
    }

    #[test]
    fn predict_uses_all_coefficients() {
        let coefs = [-1.0, 0.5, -0.25];
        let eta = linear_predictor(&coefs, &[4.0, 2.0]);
        assert!((eta - 0.5).abs() < 1e-15);

        let r = AnalysisRecord::new(false, Some(4.0), Some(2.0));
        let p = predict_probability(ModelKind::Combined, &coefs, &r).unwrap();
        assert!((p - inverse_logit(0.5)).abs() < 1e-15);
    }

    #[test]
    fn predict_is_none_without_predictor() {
        let r = AnalysisRecord::new(false, None, Some(2100.0));
        assert!(predict_probability(ModelKind::Velocity, &[0.0, 1.0], &r).is_none());
    }

    #[test]
    fn grid_spans_range_and_is_monotone() {
        let model = FittedModel {
            kind: ModelKind::Velocity,
            coefficients: vec![-48.8, 0.52],
            std_errors: vec![30.0, 0.3],
            deviance: 9.7,
            null_deviance: 13.5,
            aic: 13.7,
            iterations: 4,
            n_used: 10,
            n_excluded: 0,
        };
        let grid = probability_grid(&model, 88.0, 99.0, GRID_POINTS).unwrap();
        assert_eq!(grid.x.len(), 101);
        assert_eq!(grid.p.len(), 101);
        assert_eq!(grid.x[0], 88.0);
        assert!((grid.x[100] - 99.0).abs() < 1e-12);
        assert!(grid.p.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(grid.predictor, Predictor::ReleaseSpeed);

        let combined = FittedModel {
            kind: ModelKind::Combined,
            coefficients: vec![0.0, 0.0, 0.0],
            std_errors: vec![1.0; 3],
            ..model
        };
        assert!(probability_grid(&combined, 0.0, 1.0, 5).is_none());
    }

    #[test]
    fn observed_range_ignores_missing_and_widens_flat() {
        let records = [
            AnalysisRecord::new(true, Some(95.0), None),
            AnalysisRecord::new(false, None, None),
            AnalysisRecord::new(false, Some(91.0), None),
        ];
        assert_eq!(observed_range(&records, Predictor::ReleaseSpeed), Some((91.0, 95.0)));
        assert_eq!(observed_range(&records, Predictor::ReleaseSpinRate), None);
        assert_eq!(observed_range(&records[..1], Predictor::ReleaseSpeed), Some((94.5, 95.5)));
    }
}
