//! Fit the V / S / C model suite.
//!
//! Each model is fitted independently over the same analysis records, with its
//! own row filtering. A failure in one model is recorded next to the others'
//! fits; it never aborts the suite.
//!
//! For diagnostics the suite also names the lowest-AIC model, but only when
//! every fitted model used exactly the same rows (otherwise AICs are not
//! comparable).

use tracing::{info, warn};

use crate::domain::{AnalysisRecord, FittedModel, ModelFailure, ModelKind};
use crate::error::ModelError;
use crate::fit::irls::{FitOptions, fit_model};

/// Outcome of one model fit.
#[derive(Debug, Clone)]
pub struct ModelOutcome {
    pub kind: ModelKind,
    pub result: Result<FittedModel, ModelError>,
}

/// Outcomes for all three models, in `ModelKind::ALL` order.
#[derive(Debug, Clone)]
pub struct ModelSuite {
    pub outcomes: Vec<ModelOutcome>,
}

impl ModelSuite {
    pub fn get(&self, kind: ModelKind) -> Option<&FittedModel> {
        self.outcomes
            .iter()
            .find(|o| o.kind == kind)
            .and_then(|o| o.result.as_ref().ok())
    }

    pub fn fitted(&self) -> impl Iterator<Item = &FittedModel> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> Vec<ModelFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| {
                o.result.as_ref().err().map(|e| ModelFailure {
                    kind: o.kind,
                    message: e.to_string(),
                    fit_failure: e.is_fit_failure(),
                })
            })
            .collect()
    }

    /// Lowest-AIC model, if all fitted models share the same rows.
    pub fn best_by_aic(&self) -> Option<&FittedModel> {
        let mut fitted = self.fitted();
        let first = fitted.next()?;
        let mut best = first;
        for m in fitted {
            if m.n_used != first.n_used || m.n_excluded != first.n_excluded {
                return None;
            }
            if m.aic < best.aic {
                best = m;
            }
        }
        Some(best)
    }
}

/// Fit V, S and C over the same records.
pub fn fit_suite(records: &[AnalysisRecord], opts: &FitOptions) -> ModelSuite {
    let outcomes = ModelKind::ALL
        .iter()
        .map(|&kind| {
            let result = fit_model(kind, records, opts);
            match &result {
                Ok(m) => info!(
                    model = %kind,
                    iterations = m.iterations,
                    n_used = m.n_used,
                    n_excluded = m.n_excluded,
                    "model fitted"
                ),
                Err(e) => warn!(model = %kind, "model fit failed: {e}"),
            }
            ModelOutcome { kind, result }
        })
        .collect();

    ModelSuite { outcomes }
}
