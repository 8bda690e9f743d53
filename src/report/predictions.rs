//! Per-row predicted whiff probabilities.

use serde::Serialize;

use crate::domain::{AnalysisRecord, ModelKind};
use crate::fit::ModelSuite;
use crate::models::predict_probability;

/// One analysis record with the probability under each model.
///
/// A probability is `None` when the model failed to fit or the row lacks one
/// of the model's predictors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    /// 1-based position in the analysis set.
    pub row: usize,
    pub result: bool,
    pub response: u8,
    pub release_speed: Option<f64>,
    pub release_spin_rate: Option<f64>,
    pub p_velocity: Option<f64>,
    pub p_spin: Option<f64>,
    pub p_combined: Option<f64>,
}

/// Evaluate every fitted model on every record. Inputs are left untouched.
pub fn compute_predictions(records: &[AnalysisRecord], suite: &ModelSuite) -> Vec<PredictionRow> {
    let p = |kind: ModelKind, r: &AnalysisRecord| {
        suite
            .get(kind)
            .and_then(|m| predict_probability(kind, &m.coefficients, r))
    };

    records
        .iter()
        .enumerate()
        .map(|(i, r)| PredictionRow {
            row: i + 1,
            result: r.result,
            response: r.response,
            release_speed: r.release_speed,
            release_spin_rate: r.release_spin_rate,
            p_velocity: p(ModelKind::Velocity, r),
            p_spin: p(ModelKind::Spin, r),
            p_combined: p(ModelKind::Combined, r),
        })
        .collect()
}
