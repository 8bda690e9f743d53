//! 50% decision boundary of a univariate logistic model.
//!
//! `p = 0.5` exactly where the linear predictor is zero, so the boundary is the
//! root of `β0 + β1·x = 0`, i.e. `x* = -β0 / β1`. No refit is involved.

use crate::domain::{Boundary, FittedModel, ModelKind};
use crate::error::ModelError;
use crate::fit::suite::ModelSuite;

/// Boundary result for one fitted univariate model.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryOutcome {
    pub kind: ModelKind,
    pub result: Result<Boundary, ModelError>,
}

/// Solve `0 = β0 + β1·x` for `x`.
pub fn solve_boundary(beta0: f64, beta1: f64) -> Result<f64, ModelError> {
    if beta1 == 0.0 {
        return Err(ModelError::DegenerateBoundary);
    }
    let x = -beta0 / beta1;
    if x.is_finite() {
        Ok(x)
    } else {
        Err(ModelError::DegenerateBoundary)
    }
}

/// Decision boundary for a fitted single-predictor model.
pub fn decision_boundary(model: &FittedModel) -> Result<Boundary, ModelError> {
    let predictor = model
        .kind
        .univariate_predictor()
        .ok_or(ModelError::BoundaryNeedsUnivariate { model: model.kind })?;
    let value = solve_boundary(model.intercept(), model.coefficients[1])?;
    Ok(Boundary {
        kind: model.kind,
        predictor,
        value,
    })
}

/// Boundaries for every fitted univariate model of the suite (V, then S).
///
/// Models that failed to fit are skipped; their failure is reported elsewhere.
pub fn suite_boundaries(suite: &ModelSuite) -> Vec<BoundaryOutcome> {
    suite
        .fitted()
        .filter(|m| m.kind.univariate_predictor().is_some())
        .map(|m| BoundaryOutcome {
            kind: m.kind,
            result: decision_boundary(m),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKind, Predictor};

    fn fitted(kind: ModelKind, coefficients: Vec<f64>) -> FittedModel {
        FittedModel {
            kind,
            std_errors: vec![0.1; coefficients.len()],
            coefficients,
            deviance: 1.0,
            null_deviance: 2.0,
            aic: 5.0,
            iterations: 4,
            n_used: 10,
            n_excluded: 0,
        }
    }

    #[test]
    fn boundary_examples() {
        assert!((solve_boundary(-10.0, 0.1).unwrap() - 100.0).abs() < 1e-9);
        assert!((solve_boundary(5.0, -0.5).unwrap() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn flat_model_has_no_boundary() {
        assert_eq!(solve_boundary(1.5, 0.0), Err(ModelError::DegenerateBoundary));
        assert_eq!(solve_boundary(1.5, -0.0), Err(ModelError::DegenerateBoundary));
    }

    #[test]
    fn decision_boundary_for_velocity_model() {
        let b = decision_boundary(&fitted(ModelKind::Velocity, vec![-10.0, 0.1])).unwrap();
        assert_eq!(b.predictor, Predictor::ReleaseSpeed);
        assert!((b.value - 100.0).abs() < 1e-9);
    }

    #[test]
    fn combined_model_is_rejected() {
        let err = decision_boundary(&fitted(ModelKind::Combined, vec![1.0, 0.2, 0.3])).unwrap_err();
        assert_eq!(
            err,
            ModelError::BoundaryNeedsUnivariate {
                model: ModelKind::Combined
            }
        );
    }

    #[test]
    fn suite_boundaries_skip_combined_and_round_trip() {
        use crate::domain::AnalysisRecord;
        use crate::fit::{FitOptions, fit_suite};
        use crate::models::predict_at;

        let speeds = [88.0, 90.0, 91.0, 92.0, 93.0, 94.0, 95.0, 96.0, 97.0, 99.0];
        let spins = [2200.0, 2350.0, 2300.0, 2250.0, 2400.0, 2280.0, 2310.0, 2450.0, 2330.0, 2500.0];
        let whiffs = [false, false, true, false, false, true, false, true, true, true];
        let records: Vec<AnalysisRecord> = (0..10)
            .map(|i| AnalysisRecord::new(whiffs[i], Some(speeds[i]), Some(spins[i])))
            .collect();

        let suite = fit_suite(&records, &FitOptions::default());
        let outcomes = suite_boundaries(&suite);
        let kinds: Vec<ModelKind> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![ModelKind::Velocity, ModelKind::Spin]);

        for o in &outcomes {
            let b = o.result.as_ref().unwrap();
            let m = suite.get(o.kind).unwrap();
            assert!((predict_at(&m.coefficients, &[b.value]) - 0.5).abs() < 1e-6);
        }
    }
}
