//! Whiff labeling and analysis-record selection.
//!
//! Labeling is a literal string match on the outcome description; nothing is
//! trimmed or case-folded, and a missing description is simply not a whiff.

use crate::domain::{AnalysisRecord, LabeledPitch, PitchRecord, WHIFF_DESCRIPTIONS};

/// `true` iff `description` is exactly one of the whiff outcomes.
pub fn is_whiff(description: Option<&str>) -> bool {
    description.is_some_and(|d| WHIFF_DESCRIPTIONS.contains(&d))
}

/// Attach the whiff label to each pitch, leaving the pitch itself untouched.
pub fn label_pitches(pitches: &[PitchRecord]) -> Vec<LabeledPitch> {
    pitches
        .iter()
        .map(|p| LabeledPitch {
            pitch: p.clone(),
            result: is_whiff(p.description.as_deref()),
        })
        .collect()
}

/// Project labeled swung-at pitches down to `{result, release_speed, release_spin_rate, response}`.
///
/// Rows with missing predictors pass through; each model decides which rows it can use.
pub fn select_analysis_records(labeled: &[LabeledPitch]) -> Vec<AnalysisRecord> {
    labeled.iter().map(AnalysisRecord::from_labeled).collect()
}
