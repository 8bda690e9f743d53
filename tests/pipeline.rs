use std::path::PathBuf;

use whiff_model::app::pipeline::run_fit_from_readers;
use whiff_model::data::{SampleConfig, generate_sample};
use whiff_model::domain::{AnalysisRecord, FitConfig, ModelKind};
use whiff_model::error::ModelError;
use whiff_model::fit::{FitOptions, decision_boundary, fit_model};
use whiff_model::io::{build_models_file, read_pitches, write_pitches, write_predictions};
use whiff_model::models::predict_at;
use whiff_model::plot::render_grid_plot;

fn config() -> FitConfig {
    FitConfig {
        pitches_csv: PathBuf::from("pitches.csv"),
        swings_csv: PathBuf::from("swings.csv"),
        max_iter: 25,
        tolerance: 1e-8,
        top_n: 5,
        plot: false,
        plot_width: 60,
        plot_height: 12,
        export_predictions: None,
        export_models: None,
        svg_dir: None,
    }
}

#[test]
fn synthetic_sample_runs_end_to_end() {
    let pitches = generate_sample(&SampleConfig {
        count: 1500,
        ..SampleConfig::default()
    })
    .unwrap();
    let mut csv = Vec::new();
    write_pitches(&mut csv, &pitches).unwrap();

    let run = run_fit_from_readers(&config(), csv.as_slice(), csv.as_slice()).unwrap();
    assert_eq!(run.records.len(), 1500);
    assert!(run.suite.failures().is_empty(), "{:?}", run.suite.failures());

    let combined = run.suite.get(ModelKind::Combined).unwrap();
    assert_eq!(combined.coefficients.len(), 3);
    let v = run.suite.get(ModelKind::Velocity).unwrap();
    assert!(v.coefficients[1] > 0.0);

    // Every prediction is a probability; missing spin only blanks S and C.
    for p in &run.predictions {
        assert!(p.p_velocity.is_some_and(|x| x > 0.0 && x < 1.0));
        assert_eq!(p.p_spin.is_some(), p.release_spin_rate.is_some());
    }

    let mut out = Vec::new();
    write_predictions(&mut out, &run.predictions).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1501);

    let models = build_models_file(&run.suite, &run.records, &run.solved_boundaries());
    assert_eq!(models.models.len(), 3);
    assert_eq!(models.grids.len(), 2);
    let plot = render_grid_plot(&models.grids[0], None, 60, 12);
    assert!(plot.starts_with("Plot V:"));
}

#[test]
fn velocity_boundary_round_trips_to_half() {
    let swings = "description,release_speed\n\
        foul,88\nhit_into_play,90\nswinging_strike,91\nfoul,92\nfoul,93\n\
        foul_tip,94\nfoul,95\nswinging_strike,96\nswinging_strike,97\nswinging_strike,99\n";
    let data = read_pitches(swings.as_bytes(), "swings").unwrap();
    let records: Vec<AnalysisRecord> = data
        .pitches
        .iter()
        .map(|p| {
            let whiff = matches!(p.description.as_deref(), Some("foul_tip" | "swinging_strike"));
            AnalysisRecord::new(whiff, p.release_speed, p.release_spin_rate)
        })
        .collect();

    let fit = fit_model(ModelKind::Velocity, &records, &FitOptions::default()).unwrap();
    let b = decision_boundary(&fit).unwrap();
    assert!((predict_at(&fit.coefficients, &[b.value]) - 0.5).abs() < 1e-6);
    assert!(b.value > 88.0 && b.value < 99.0);
}

#[test]
fn five_row_separated_scenario_keeps_a_usable_estimate() {
    let records: Vec<AnalysisRecord> = [(90.0, false), (92.0, false), (94.0, true), (96.0, true), (98.0, true)]
        .into_iter()
        .map(|(v, r)| AnalysisRecord::new(r, Some(v), None))
        .collect();

    let err = fit_model(ModelKind::Velocity, &records, &FitOptions::default()).unwrap_err();
    let ModelError::PerfectSeparation { estimate, .. } = err else {
        panic!("expected separation, got {err:?}");
    };
    assert!(estimate[1] > 0.0);

    let p: Vec<f64> = records
        .iter()
        .map(|r| predict_at(&estimate, &[r.release_speed.unwrap()]))
        .collect();
    assert!(p.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn missing_description_column_is_rejected() {
    let err = run_fit_from_readers(
        &config(),
        "release_speed\n95\n".as_bytes(),
        "description,release_speed\nfoul,95\n".as_bytes(),
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
