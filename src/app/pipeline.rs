//! Shared "fit pipeline" logic used by the `fit` and `models` commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> label -> select -> fit V/S/C -> boundaries -> predictions
//!
//! The commands can then focus on presentation (which tables to print, which
//! files to export).

use std::io::Read;

use tracing::{info, warn};

use crate::data::{label_pitches, select_analysis_records};
use crate::domain::{AnalysisRecord, Boundary, FitConfig, LabeledPitch};
use crate::error::AppError;
use crate::fit::{BoundaryOutcome, FitOptions, ModelSuite, fit_suite, suite_boundaries};
use crate::io::ingest::{IngestedPitches, load_pitches, read_pitches};
use crate::report::{PredictionRow, compute_predictions};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub pitches: IngestedPitches,
    pub swings: IngestedPitches,
    /// Labeled swung-at pitches (same order as `swings.pitches`).
    pub labeled: Vec<LabeledPitch>,
    pub records: Vec<AnalysisRecord>,
    pub suite: ModelSuite,
    pub boundaries: Vec<BoundaryOutcome>,
    pub predictions: Vec<PredictionRow>,
}

impl RunOutput {
    /// Successfully solved boundaries.
    pub fn solved_boundaries(&self) -> Vec<Boundary> {
        self.boundaries
            .iter()
            .filter_map(|o| o.result.as_ref().ok().copied())
            .collect()
    }
}

/// Execute the full pipeline on the configured CSV files.
pub fn run_fit(config: &FitConfig) -> Result<RunOutput, AppError> {
    let pitches = load_pitches(&config.pitches_csv)?;
    let swings = load_pitches(&config.swings_csv)?;
    run_fit_with_data(config, pitches, swings)
}

/// Execute the pipeline on in-memory CSV sources.
pub fn run_fit_from_readers<P: Read, S: Read>(
    config: &FitConfig,
    pitches: P,
    swings: S,
) -> Result<RunOutput, AppError> {
    let pitches = read_pitches(pitches, "pitches")?;
    let swings = read_pitches(swings, "swings")?;
    run_fit_with_data(config, pitches, swings)
}

/// Execute the pipeline with already-ingested data.
pub fn run_fit_with_data(
    config: &FitConfig,
    pitches: IngestedPitches,
    swings: IngestedPitches,
) -> Result<RunOutput, AppError> {
    for ingest in [&pitches, &swings] {
        for e in &ingest.row_errors {
            warn!(source = %ingest.source, line = e.line, "{}", e.message);
        }
    }

    // 1) Label and project the swung-at set. Inputs are never modified.
    let labeled = label_pitches(&swings.pitches);
    let records = select_analysis_records(&labeled);
    info!(
        records = records.len(),
        whiffs = records.iter().filter(|r| r.result).count(),
        "analysis records selected"
    );

    // 2) Fit the three models independently.
    let opts = FitOptions {
        max_iter: config.max_iter,
        tolerance: config.tolerance,
    };
    let suite = fit_suite(&records, &opts);

    // 3) Boundaries and per-row predictions.
    let boundaries = suite_boundaries(&suite);
    for o in &boundaries {
        if let Err(e) = &o.result {
            warn!(model = %o.kind, "no decision boundary: {e}");
        }
    }
    let predictions = compute_predictions(&records, &suite);

    Ok(RunOutput {
        pitches,
        swings,
        labeled,
        records,
        suite,
        boundaries,
        predictions,
    })
}
