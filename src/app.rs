//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the fit pipeline
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FitArgs, PlotArgs, SampleArgs};
use crate::data::{SampleConfig, generate_sample};
use crate::domain::{FitConfig, ModelKind};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `whiff` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is fine; flags and real env vars still work.
    let _ = dotenvy::dotenv();
    init_logging();

    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Fit(args) => handle_fit(args, OutputMode::Full),
        Command::Models(args) => handle_fit(args, OutputMode::ModelsOnly),
        Command::Plot(args) => handle_plot(args),
        Command::Sample(args) => handle_sample(args),
    }
}

/// Logs go to stderr so stdout stays the report. `RUST_LOG` overrides the default level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    ModelsOnly,
}

fn handle_fit(args: FitArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = fit_config_from_args(&args);
    let run = pipeline::run_fit(&config)?;

    if mode == OutputMode::Full {
        println!(
            "{}",
            crate::report::format_run_summary(&run.pitches, &run.swings, run.records.len(), &config)
        );
        println!(
            "{}",
            crate::report::format_description_counts(
                "Outcomes (all pitches)",
                &crate::report::description_counts(&run.pitches.pitches),
            )
        );
        println!(
            "{}",
            crate::report::format_description_counts(
                "Outcomes (swung at)",
                &crate::report::description_counts(&run.swings.pitches),
            )
        );
        println!(
            "{}",
            crate::report::format_outcome_summary(&crate::report::summarize_outcomes(&run.labeled))
        );
        println!(
            "{}",
            crate::report::format_pitcher_table(&crate::report::pitcher_table(&run.labeled, config.top_n))
        );
    }

    println!("{}", crate::report::format_model_table(&run.suite));
    let failures = crate::report::format_failures(&run.suite.failures());
    if !failures.is_empty() {
        println!("{failures}");
    }

    match mode {
        OutputMode::Full => println!("{}", crate::report::format_boundaries(&run.boundaries)),
        OutputMode::ModelsOnly => println!("{}", crate::report::format_velocity_boundary(&run.boundaries)),
    }

    let boundaries = run.solved_boundaries();

    if mode == OutputMode::Full && config.plot {
        for kind in [ModelKind::Velocity, ModelKind::Spin] {
            let Some(model) = run.suite.get(kind) else {
                continue;
            };
            let boundary = boundaries.iter().find(|b| b.kind == kind).map(|b| b.value);
            if let Some(plot) = crate::plot::render_model_plot(
                model,
                &run.records,
                boundary,
                config.plot_width,
                config.plot_height,
            ) {
                println!("{plot}");
            }
        }
    }

    // Optional exports.
    if let Some(path) = &config.export_predictions {
        crate::io::export::write_predictions_csv(path, &run.predictions)?;
        info!(path = %path.display(), rows = run.predictions.len(), "wrote predictions");
    }
    if let Some(path) = &config.export_models {
        let file = crate::io::models::build_models_file(&run.suite, &run.records, &boundaries);
        crate::io::models::write_models_json(path, &file)?;
        info!(path = %path.display(), "wrote models JSON");
    }
    if let Some(dir) = &config.svg_dir {
        crate::plot::write_suite_svgs(dir, &run.suite, &run.records, &boundaries)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let models = crate::io::models::read_models_json(&args.models)?;

    if models.grids.is_empty() {
        return Err(AppError::new(
            3,
            format!("No univariate probability curves in '{}'.", args.models.display()),
        ));
    }

    for grid in &models.grids {
        let boundary = models
            .boundaries
            .iter()
            .find(|b| b.kind == grid.kind)
            .map(|b| b.value);
        println!(
            "{}",
            crate::plot::render_grid_plot(grid, boundary, args.width, args.height)
        );
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        count: args.count,
        seed: args.seed,
        pitchers: args.pitchers,
        ..SampleConfig::default()
    };
    let pitches = generate_sample(&config)?;
    crate::io::export::write_pitches_csv(&args.out, &pitches)?;
    println!("Wrote {} pitches to {}", pitches.len(), args.out.display());
    Ok(())
}

pub fn fit_config_from_args(args: &FitArgs) -> FitConfig {
    FitConfig {
        pitches_csv: args.input.pitches.clone(),
        swings_csv: args.input.swings.clone(),
        max_iter: args.max_iter,
        tolerance: args.tolerance,
        top_n: args.top,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_predictions: args.export.clone(),
        export_models: args.export_models.clone(),
        svg_dir: args.svg_dir.clone(),
    }
}
