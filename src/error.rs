use thiserror::Error;

use crate::domain::{ModelKind, Predictor};

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        AppError::new(4, err.to_string())
    }
}

/// Failures of the analytical core (fitting and boundary solving).
///
/// Every variant is recoverable at the pipeline level: the failing model is
/// reported and the remaining models carry on.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("model {model}: no usable `{}` values (column missing or non-numeric)", predictor.column())]
    MalformedRecord { model: ModelKind, predictor: Predictor },

    #[error("model {model}: insufficient data ({rows} usable rows, need at least {required})")]
    InsufficientData {
        model: ModelKind,
        rows: usize,
        required: usize,
    },

    #[error("model {model}: response has a single class (all {value}); logistic fit is undefined")]
    DegenerateResponse { model: ModelKind, value: u8 },

    #[error("model {model}: perfect separation after {iterations} iterations (coefficients diverge, fitted probabilities driven to 0 or 1)")]
    PerfectSeparation {
        model: ModelKind,
        iterations: usize,
        /// Last (diverging) coefficient estimate, intercept first.
        estimate: Vec<f64>,
    },

    #[error("model {model}: IRLS did not converge in {iterations} iterations (last relative deviance change {last_change:.3e})")]
    NonConvergence {
        model: ModelKind,
        iterations: usize,
        last_change: f64,
    },

    #[error("model {model}: weighted design matrix is rank deficient")]
    SingularDesign { model: ModelKind },

    #[error("no decision boundary: slope coefficient is zero (flat model)")]
    DegenerateBoundary,

    #[error("model {model}: decision boundary needs a single-predictor model")]
    BoundaryNeedsUnivariate { model: ModelKind },
}

impl ModelError {
    /// True for the fit-failure family (as opposed to row or boundary problems).
    pub fn is_fit_failure(&self) -> bool {
        matches!(
            self,
            ModelError::InsufficientData { .. }
                | ModelError::DegenerateResponse { .. }
                | ModelError::PerfectSeparation { .. }
                | ModelError::NonConvergence { .. }
                | ModelError::SingularDesign { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_messages_name_the_model() {
        let err = ModelError::MalformedRecord {
            model: ModelKind::Combined,
            predictor: Predictor::ReleaseSpinRate,
        };
        let msg = err.to_string();
        assert!(msg.contains("model C"), "{msg}");
        assert!(msg.contains("release_spin_rate"), "{msg}");
        assert!(!err.is_fit_failure());
    }

    #[test]
    fn model_error_converts_to_internal_app_error() {
        let app: AppError = ModelError::DegenerateBoundary.into();
        assert_eq!(app.exit_code(), 4);
    }
}
