//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while labeling and fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome descriptions counted as a whiff (swing-and-miss, including foul tips).
///
/// Matching is exact and case-sensitive. `swinging_pitchout` and
/// `swinging_pitchout_blocked` are deliberately absent.
pub const WHIFF_DESCRIPTIONS: [&str; 2] = ["foul_tip", "swinging_strike"];

/// One pitch event as read from the input CSV.
///
/// Only the fields used by the analysis (plus a little metadata for the
/// descriptive tables) are kept; every other column is ignored at ingest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchRecord {
    /// Raw outcome description (untrimmed).
    pub description: Option<String>,
    /// Release velocity (mph).
    pub release_speed: Option<f64>,
    /// Release spin rate (rpm).
    pub release_spin_rate: Option<f64>,
    pub player_name: Option<String>,
    pub pitch_type: Option<String>,
    pub game_date: Option<NaiveDate>,
}

/// A pitch record with its derived whiff label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPitch {
    pub pitch: PitchRecord,
    /// `true` iff the description is one of [`WHIFF_DESCRIPTIONS`].
    pub result: bool,
}

/// Projection of a labeled swung-at pitch used for model fitting.
///
/// Build it with [`AnalysisRecord::from_labeled`] (or [`AnalysisRecord::new`])
/// so that `response` always agrees with `result`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub result: bool,
    pub release_speed: Option<f64>,
    pub release_spin_rate: Option<f64>,
    /// `1` for a whiff, `0` otherwise.
    pub response: u8,
}

impl AnalysisRecord {
    pub fn new(result: bool, release_speed: Option<f64>, release_spin_rate: Option<f64>) -> Self {
        Self {
            result,
            release_speed,
            release_spin_rate,
            response: u8::from(result),
        }
    }

    pub fn from_labeled(labeled: &LabeledPitch) -> Self {
        Self::new(
            labeled.result,
            labeled.pitch.release_speed,
            labeled.pitch.release_spin_rate,
        )
    }

    /// Value of a single predictor, if present and finite.
    pub fn value(&self, predictor: Predictor) -> Option<f64> {
        let v = match predictor {
            Predictor::ReleaseSpeed => self.release_speed,
            Predictor::ReleaseSpinRate => self.release_spin_rate,
        }?;
        v.is_finite().then_some(v)
    }
}

/// A numeric column used as a model predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predictor {
    ReleaseSpeed,
    ReleaseSpinRate,
}

impl Predictor {
    /// CSV column name.
    pub fn column(self) -> &'static str {
        match self {
            Predictor::ReleaseSpeed => "release_speed",
            Predictor::ReleaseSpinRate => "release_spin_rate",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Predictor::ReleaseSpeed => "mph",
            Predictor::ReleaseSpinRate => "rpm",
        }
    }
}

/// The three logistic models fitted by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// `response ~ release_speed`
    Velocity,
    /// `response ~ release_spin_rate`
    Spin,
    /// `response ~ release_speed + release_spin_rate`
    Combined,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [ModelKind::Velocity, ModelKind::Spin, ModelKind::Combined];

    /// Short label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Velocity => "V",
            ModelKind::Spin => "S",
            ModelKind::Combined => "C",
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            ModelKind::Velocity => "response ~ release_speed",
            ModelKind::Spin => "response ~ release_spin_rate",
            ModelKind::Combined => "response ~ release_speed + release_spin_rate",
        }
    }

    /// Predictor columns in design-matrix order (after the intercept).
    pub fn predictors(self) -> &'static [Predictor] {
        match self {
            ModelKind::Velocity => &[Predictor::ReleaseSpeed],
            ModelKind::Spin => &[Predictor::ReleaseSpinRate],
            ModelKind::Combined => &[Predictor::ReleaseSpeed, Predictor::ReleaseSpinRate],
        }
    }

    /// Number of coefficients including the intercept.
    pub fn coef_len(self) -> usize {
        self.predictors().len() + 1
    }

    /// The single predictor of a univariate model.
    pub fn univariate_predictor(self) -> Option<Predictor> {
        match self.predictors() {
            [p] => Some(*p),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A converged maximum-likelihood logistic fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    pub kind: ModelKind,
    /// `[β0, β1(, β2)]`, intercept first.
    pub coefficients: Vec<f64>,
    /// Asymptotic standard errors (`sqrt(diag((XᵀWX)⁻¹))`), same order.
    pub std_errors: Vec<f64>,
    /// Residual deviance.
    pub deviance: f64,
    /// Deviance of the intercept-only model on the same rows.
    pub null_deviance: f64,
    pub aic: f64,
    pub iterations: usize,
    pub n_used: usize,
    pub n_excluded: usize,
}

impl FittedModel {
    pub fn intercept(&self) -> f64 {
        self.coefficients[0]
    }

    /// Wald z statistic per coefficient.
    pub fn z_values(&self) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(self.std_errors.iter())
            .map(|(b, se)| if *se > 0.0 { b / se } else { f64::NAN })
            .collect()
    }
}

/// A run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub pitches_csv: PathBuf,
    pub swings_csv: PathBuf,

    /// IRLS iteration cap.
    pub max_iter: usize,
    /// Relative deviance change below which IRLS is converged.
    pub tolerance: f64,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_predictions: Option<PathBuf>,
    pub export_models: Option<PathBuf>,
    pub svg_dir: Option<PathBuf>,
}

/// A failed model fit as stored in the models file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFailure {
    pub kind: ModelKind,
    pub message: String,
    /// The fit itself failed, as opposed to the model's input columns.
    #[serde(default)]
    pub fit_failure: bool,
}

/// A 50% decision boundary for a univariate model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub kind: ModelKind,
    pub predictor: Predictor,
    pub value: f64,
}

/// Fitted probability curve sampled over the observed predictor range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityGrid {
    pub kind: ModelKind,
    pub predictor: Predictor,
    pub x: Vec<f64>,
    pub p: Vec<f64>,
}

/// A saved models file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsFile {
    pub tool: String,
    /// RFC 3339 generation timestamp.
    pub generated: String,
    pub n_records: usize,
    pub models: Vec<FittedModel>,
    pub failures: Vec<ModelFailure>,
    pub boundaries: Vec<Boundary>,
    pub grids: Vec<ProbabilityGrid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_follows_result() {
        let whiff = AnalysisRecord::new(true, Some(95.0), None);
        let contact = AnalysisRecord::new(false, None, Some(2300.0));
        assert_eq!(whiff.response, 1);
        assert_eq!(contact.response, 0);
    }

    #[test]
    fn value_hides_non_finite() {
        let r = AnalysisRecord::new(false, Some(f64::NAN), Some(2250.0));
        assert_eq!(r.value(Predictor::ReleaseSpeed), None);
        assert_eq!(r.value(Predictor::ReleaseSpinRate), Some(2250.0));
    }

    #[test]
    fn model_kinds_have_expected_designs() {
        assert_eq!(ModelKind::Velocity.coef_len(), 2);
        assert_eq!(ModelKind::Spin.coef_len(), 2);
        assert_eq!(ModelKind::Combined.coef_len(), 3);
        assert_eq!(ModelKind::Combined.univariate_predictor(), None);
        assert_eq!(
            ModelKind::Spin.univariate_predictor(),
            Some(Predictor::ReleaseSpinRate)
        );
    }
}
