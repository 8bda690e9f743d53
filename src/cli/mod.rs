//! Command-line parsing for the whiff model runner.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "whiff", version, about = "Whiff probability models from pitch-level data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit models V, S and C, print summaries/tables/plots, and optionally export.
    Fit(FitArgs),
    /// Print the model table and decision boundary only (useful for scripting).
    Models(FitArgs),
    /// Plot the probability curves stored in a models JSON file.
    Plot(PlotArgs),
    /// Write a synthetic swung-at pitch CSV.
    Sample(SampleArgs),
}

/// Input files.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// CSV of all pitches.
    #[arg(long, env = "WHIFF_PITCHES", value_name = "CSV")]
    pub pitches: PathBuf,

    /// CSV of pitches that were swung at (the analysis set).
    #[arg(long, env = "WHIFF_SWINGS", value_name = "CSV")]
    pub swings: PathBuf,
}

/// Common options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// IRLS iteration cap.
    #[arg(long, default_value_t = 25)]
    pub max_iter: usize,

    /// Relative deviance change that counts as converged.
    #[arg(long, default_value_t = 1e-8)]
    pub tolerance: f64,

    /// Show top-N pitchers by swings.
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Render ASCII plots in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plots.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export per-row predicted probabilities to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export fitted models (+ boundaries and probability grids) to JSON.
    #[arg(long = "export-models", value_name = "JSON")]
    pub export_models: Option<PathBuf>,

    /// Write one SVG chart per univariate model into this directory.
    #[arg(long = "svg-dir", value_name = "DIR")]
    pub svg_dir: Option<PathBuf>,
}

/// Options for plotting a saved models file.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Models JSON file produced by `whiff fit --export-models`.
    #[arg(long, value_name = "JSON")]
    pub models: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for synthetic data generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Output CSV path.
    #[arg(long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of swung-at pitches to generate.
    #[arg(short = 'n', long, default_value_t = 2000)]
    pub count: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of distinct pitchers.
    #[arg(long, default_value_t = 25)]
    pub pitchers: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_defaults() {
        let cli = Cli::try_parse_from(["whiff", "fit", "--pitches", "a.csv", "--swings", "b.csv"]).unwrap();
        let Command::Fit(args) = cli.command else {
            panic!("expected fit");
        };
        assert_eq!(args.input.pitches, PathBuf::from("a.csv"));
        assert_eq!(args.max_iter, 25);
        assert_eq!(args.tolerance, 1e-8);
        assert_eq!(args.top, 10);
        assert!(args.plot && !args.no_plot);
        assert_eq!((args.width, args.height), (80, 20));
        assert!(args.export.is_none());
    }

    #[test]
    fn sample_short_count_flag() {
        let cli = Cli::try_parse_from(["whiff", "sample", "--out", "s.csv", "-n", "50", "--seed", "7"]).unwrap();
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        assert_eq!(args.count, 50);
        assert_eq!(args.seed, 7);
    }

    #[test]
    fn plot_requires_models_file() {
        assert!(Cli::try_parse_from(["whiff", "plot"]).is_err());
    }
}
