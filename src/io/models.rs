//! Read/write models JSON files.
//!
//! The models file is the "portable" representation of a run:
//! - fitted models (coefficients, standard errors, deviance, AIC)
//! - failed models with their error message
//! - decision boundaries
//! - a precomputed probability grid per univariate model for quick plotting
//!
//! The schema is defined by `domain::ModelsFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{AnalysisRecord, Boundary, ModelsFile};
use crate::error::AppError;
use crate::fit::ModelSuite;
use crate::models::{GRID_POINTS, observed_range, probability_grid};

/// Assemble the models file for a finished run.
pub fn build_models_file(suite: &ModelSuite, records: &[AnalysisRecord], boundaries: &[Boundary]) -> ModelsFile {
    let grids = suite
        .fitted()
        .filter_map(|m| {
            let predictor = m.kind.univariate_predictor()?;
            let (x_min, x_max) = observed_range(records, predictor)?;
            probability_grid(m, x_min, x_max, GRID_POINTS)
        })
        .collect();

    ModelsFile {
        tool: "whiff".to_string(),
        generated: chrono::Local::now().to_rfc3339(),
        n_records: records.len(),
        models: suite.fitted().cloned().collect(),
        failures: suite.failures(),
        boundaries: boundaries.to_vec(),
        grids,
    }
}

/// Write a models JSON file.
pub fn write_models_json(path: &Path, models: &ModelsFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create models JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, models)
        .map_err(|e| AppError::new(2, format!("Failed to write models JSON: {e}")))?;

    Ok(())
}

/// Read a models JSON file.
pub fn read_models_json(path: &Path) -> Result<ModelsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open models JSON '{}': {e}", path.display())))?;
    let models: ModelsFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid models JSON: {e}")))?;
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ModelKind;
    use crate::fit::{FitOptions, fit_suite, suite_boundaries};

    fn records() -> Vec<AnalysisRecord> {
        let speeds = [88.0, 90.0, 91.0, 92.0, 93.0, 94.0, 95.0, 96.0, 97.0, 99.0];
        let whiffs = [false, false, true, false, false, true, false, true, true, true];
        (0..10)
            .map(|i| AnalysisRecord::new(whiffs[i], Some(speeds[i]), None))
            .collect()
    }

    #[test]
    fn models_file_carries_fits_failures_and_grids() {
        let records = records();
        let suite = fit_suite(&records, &FitOptions::default());
        let boundaries: Vec<Boundary> = suite_boundaries(&suite)
            .into_iter()
            .filter_map(|o| o.result.ok())
            .collect();

        let file = build_models_file(&suite, &records, &boundaries);
        assert_eq!(file.tool, "whiff");
        assert_eq!(file.n_records, 10);
        assert_eq!(file.models.len(), 1);
        assert_eq!(file.models[0].kind, ModelKind::Velocity);
        assert_eq!(file.failures.len(), 2);
        assert_eq!(file.boundaries.len(), 1);
        assert_eq!(file.grids.len(), 1);
        assert_eq!(file.grids[0].x.len(), GRID_POINTS);
        assert_eq!(file.grids[0].x[0], 88.0);
    }

    #[test]
    fn json_file_reads_back() {
        let records = records();
        let suite = fit_suite(&records, &FitOptions::default());
        let file = build_models_file(&suite, &records, &[]);

        let path = std::env::temp_dir().join(format!("whiff-models-test-{}.json", std::process::id()));
        write_models_json(&path, &file).unwrap();
        let back = read_models_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.models.len(), file.models.len());
        assert_eq!(back.failures, file.failures);
        assert_eq!(back.grids[0].x.len(), GRID_POINTS);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = read_models_json(Path::new("/nonexistent/whiff-models.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
