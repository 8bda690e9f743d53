//! SVG charts via Plotters.
//!
//! One chart per fitted univariate model: observed 0/1 responses, the fitted
//! probability curve, and the 50% decision boundary when it lies inside the
//! observed range.

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use crate::domain::{AnalysisRecord, Boundary, FittedModel, ModelKind, ProbabilityGrid};
use crate::error::AppError;
use crate::fit::ModelSuite;
use crate::models::{GRID_POINTS, observed_range, probability_grid};

const SIZE: (u32, u32) = (900, 560);

/// Write one SVG per fitted univariate model into `dir` (created if needed).
///
/// Returns the written paths in `ModelKind::ALL` order.
pub fn write_suite_svgs(
    dir: &Path,
    suite: &ModelSuite,
    records: &[AnalysisRecord],
    boundaries: &[Boundary],
) -> Result<Vec<PathBuf>, AppError> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::new(2, format!("Failed to create SVG directory '{}': {e}", dir.display()))
    })?;

    let mut written = Vec::new();
    for model in suite.fitted() {
        let Some(predictor) = model.kind.univariate_predictor() else {
            continue;
        };
        let path = dir.join(file_name(model.kind));
        let boundary = boundaries.iter().find(|b| b.kind == model.kind).map(|b| b.value);
        write_model_svg(&path, model, records, boundary)?;
        info!(model = %model.kind, predictor = predictor.column(), path = %path.display(), "wrote SVG chart");
        written.push(path);
    }
    Ok(written)
}

/// Write a single model chart.
pub fn write_model_svg(
    path: &Path,
    model: &FittedModel,
    records: &[AnalysisRecord],
    boundary: Option<f64>,
) -> Result<(), AppError> {
    let predictor = model.kind.univariate_predictor().ok_or_else(|| {
        AppError::new(4, format!("Model {} has no single predictor to chart.", model.kind))
    })?;
    let (x_min, x_max) = observed_range(records, predictor)
        .ok_or_else(|| AppError::new(4, format!("No `{}` values to chart.", predictor.column())))?;
    let grid = probability_grid(model, x_min, x_max, GRID_POINTS)
        .ok_or_else(|| AppError::new(4, "Failed to sample probability curve."))?;

    let points: Vec<(f64, f64)> = records
        .iter()
        .filter_map(|r| r.value(predictor).map(|x| (x, f64::from(r.response))))
        .collect();

    draw_chart(path, model.kind, &grid, &points, boundary)
        .map_err(|e| AppError::new(4, format!("Failed to render SVG '{}': {e}", path.display())))
}

fn file_name(kind: ModelKind) -> String {
    match kind.univariate_predictor() {
        Some(p) => format!("model_{}_{}.svg", kind.display_name().to_lowercase(), p.column()),
        None => format!("model_{}.svg", kind.display_name().to_lowercase()),
    }
}

fn draw_chart(
    path: &Path,
    kind: ModelKind,
    grid: &ProbabilityGrid,
    points: &[(f64, f64)],
    boundary: Option<f64>,
) -> Result<(), Box<dyn Error>> {
    let x0 = grid.x.first().copied().unwrap_or(0.0);
    let x1 = grid.x.last().copied().unwrap_or(1.0);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Model {kind}: {}", kind.formula()), ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x0..x1, -0.05f64..1.05f64)?;

    chart
        .configure_mesh()
        .x_desc(format!("{} ({})", grid.predictor.column(), grid.predictor.unit()))
        .y_desc("P(whiff)")
        .draw()?;

    // Observed responses, translucent so dense regions read darker.
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.25).filled())),
    )?;

    chart
        .draw_series(LineSeries::new(
            grid.x.iter().copied().zip(grid.p.iter().copied()),
            &RED,
        ))?
        .label("fitted")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    if let Some(b) = boundary.filter(|b| (x0..=x1).contains(b)) {
        chart
            .draw_series(LineSeries::new(vec![(b, 0.0), (b, 1.0)], &BLACK))?
            .label(format!("p = 0.5 at {b:.2}"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::{FitOptions, fit_suite, suite_boundaries};

    fn records() -> Vec<AnalysisRecord> {
        let speeds = [88.0, 90.0, 91.0, 92.0, 93.0, 94.0, 95.0, 96.0, 97.0, 99.0];
        let spins = [2200.0, 2350.0, 2300.0, 2250.0, 2400.0, 2280.0, 2310.0, 2450.0, 2330.0, 2500.0];
        let whiffs = [false, false, true, false, false, true, false, true, true, true];
        (0..10)
            .map(|i| AnalysisRecord::new(whiffs[i], Some(speeds[i]), Some(spins[i])))
            .collect()
    }

    #[test]
    fn file_names_follow_model_and_predictor() {
        assert_eq!(file_name(ModelKind::Velocity), "model_v_release_speed.svg");
        assert_eq!(file_name(ModelKind::Spin), "model_s_release_spin_rate.svg");
    }

    #[test]
    fn writes_one_svg_per_univariate_model() {
        let records = records();
        let suite = fit_suite(&records, &FitOptions::default());
        let boundaries: Vec<Boundary> = suite_boundaries(&suite)
            .into_iter()
            .filter_map(|o| o.result.ok())
            .collect();

        let dir = std::env::temp_dir().join(format!("whiff-svg-test-{}", std::process::id()));
        let written = write_suite_svgs(&dir, &suite, &records, &boundaries).unwrap();

        assert_eq!(written.len(), 2);
        for path in &written {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"));
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
