//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::domain::{FitConfig, ModelFailure, ModelKind};
use crate::fit::{BoundaryOutcome, ModelSuite};
use crate::io::ingest::IngestedPitches;
use crate::report::summary::{ColumnStats, DescriptionCount, OutcomeSummary, PitcherRow};

/// Run header: inputs, row counts, fit settings, ingest notes.
pub fn format_run_summary(
    pitches: &IngestedPitches,
    swings: &IngestedPitches,
    n_records: usize,
    config: &FitConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== whiff - Whiff Probability Models ===\n");
    out.push_str(&format!("All pitches : {} ({})\n", pitches.source, rows_kept(pitches)));
    out.push_str(&format!("Swung at    : {} ({})\n", swings.source, rows_kept(swings)));
    out.push_str(&format!("Analysis rows: n={n_records}\n"));
    out.push_str(&format!(
        "IRLS: max_iter={} tolerance={:e}\n",
        config.max_iter, config.tolerance
    ));

    for ingest in [pitches, swings] {
        out.push_str(&format_ingest_notes(ingest));
    }
    out.push('\n');

    out
}

fn rows_kept(ingest: &IngestedPitches) -> String {
    format!("{} of {} rows kept", ingest.pitches.len(), ingest.rows_read)
}

fn format_ingest_notes(ingest: &IngestedPitches) -> String {
    let mut out = String::new();
    if !ingest.missing_columns.is_empty() {
        out.push_str(&format!(
            "  note: {} has no column(s): {}\n",
            ingest.source,
            ingest.missing_columns.join(", ")
        ));
    }
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "  note: {} row issue(s) in {}",
            ingest.row_errors.len(),
            ingest.source
        ));
        if let Some(first) = ingest.row_errors.first() {
            out.push_str(&format!(" (first: line {}: {})", first.line, first.message));
        }
        out.push('\n');
    }
    out
}

/// Description frequency table.
pub fn format_description_counts(title: &str, counts: &[DescriptionCount]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}:\n"));
    push_row(&mut out, format!("{:<28} {:>8} {:>7}", "description", "count", "share"));
    push_row(&mut out, format!("{:-<28} {:-<8} {:-<7}", "", "", ""));
    for c in counts {
        push_row(
            &mut out,
            format!(
                "{:<28} {:>8} {:>6.1}%",
                truncate(&c.description, 28),
                c.count,
                100.0 * c.share
            ),
        );
    }
    out
}

/// Whiff rate plus predictor statistics by outcome.
pub fn format_outcome_summary(summary: &OutcomeSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Whiffs: {} of {} swings ({:.1}%)\n",
        summary.whiffs,
        summary.swings,
        100.0 * summary.whiff_rate
    ));

    push_row(
        &mut out,
        format!(
            "{:<8} {:>7} {:<18} {:>9} {:>8} {:>9} {:>9} {:>7}",
            "outcome", "n", "predictor", "mean", "sd", "min", "max", "missing"
        ),
    );
    push_row(
        &mut out,
        format!("{:-<8} {:-<7} {:-<18} {:-<9} {:-<8} {:-<9} {:-<9} {:-<7}", "", "", "", "", "", "", "", ""),
    );
    for g in &summary.groups {
        let label = if g.result { "whiff" } else { "contact" };
        for (name, stats) in [("release_speed", &g.speed), ("release_spin_rate", &g.spin)] {
            push_row(&mut out, format_stats_row(label, g.count, name, stats));
        }
    }
    out
}

fn format_stats_row(label: &str, count: usize, name: &str, s: &ColumnStats) -> String {
    format!(
        "{:<8} {:>7} {:<18} {:>9} {:>8} {:>9} {:>9} {:>7}",
        label,
        count,
        name,
        fmt_opt(s.mean, 2),
        fmt_opt(s.sd, 2),
        fmt_opt(s.min, 1),
        fmt_opt(s.max, 1),
        s.missing
    )
}

/// Per-pitcher table.
pub fn format_pitcher_table(rows: &[PitcherRow]) -> String {
    let mut out = String::new();
    out.push_str("Pitchers (most swings):\n");
    push_row(
        &mut out,
        format!(
            "{:<24} {:>7} {:>7} {:>7} {:>8} {:>8}",
            "pitcher", "swings", "whiffs", "rate", "velo", "spin"
        ),
    );
    push_row(&mut out, format!("{:-<24} {:-<7} {:-<7} {:-<7} {:-<8} {:-<8}", "", "", "", "", "", ""));
    for r in rows {
        push_row(
            &mut out,
            format!(
                "{:<24} {:>7} {:>7} {:>6.1}% {:>8} {:>8}",
                truncate(&r.name, 24),
                r.swings,
                r.whiffs,
                100.0 * r.whiff_rate,
                fmt_opt(r.mean_speed, 1),
                fmt_opt(r.mean_spin, 0)
            ),
        );
    }
    if rows.is_empty() {
        out.push_str("(no player_name values)\n");
    }
    out
}

/// Coefficient table for every fitted model, plus a deviance line each.
pub fn format_model_table(suite: &ModelSuite) -> String {
    let mut out = String::new();
    out.push_str("Models:\n");

    let best = suite.best_by_aic().map(|m| m.kind);
    for m in suite.fitted() {
        let marker = if Some(m.kind) == best { "*" } else { " " };
        out.push_str(&format!("{marker} {} : {}\n", m.kind.display_name(), m.kind.formula()));
        push_row(&mut out, format!("    {:<18} {:>14} {:>12} {:>9}", "term", "estimate", "std.err", "z"));

        let terms = std::iter::once("(intercept)").chain(m.kind.predictors().iter().map(|p| p.column()));
        let z = m.z_values();
        for (i, term) in terms.enumerate() {
            push_row(
                &mut out,
                format!(
                    "    {:<18} {:>14.6} {:>12.6} {:>9.3}",
                    term, m.coefficients[i], m.std_errors[i], z[i]
                ),
            );
        }
        out.push_str(&format!(
            "    deviance={:.4} (null {:.4}) AIC={:.4} iterations={} rows used={} excluded={}\n",
            m.deviance, m.null_deviance, m.aic, m.iterations, m.n_used, m.n_excluded
        ));
    }
    if best.is_some() {
        out.push_str("  (* lowest AIC on identical rows)\n");
    }

    out
}

/// Failed fits, one line each, input problems before fit failures.
/// Empty string when every model fitted.
pub fn format_failures(failures: &[ModelFailure]) -> String {
    let mut out = String::new();
    let groups = [
        ("Model input problems:\n", false),
        ("Model fit failures:\n", true),
    ];
    for (title, fit_failure) in groups {
        let mut group = failures.iter().filter(|f| f.fit_failure == fit_failure).peekable();
        if group.peek().is_none() {
            continue;
        }
        out.push_str(title);
        for f in group {
            out.push_str(&format!("  {}: {}\n", f.kind.display_name(), f.message));
        }
    }
    out
}

/// 50% decision boundaries.
pub fn format_boundaries(outcomes: &[BoundaryOutcome]) -> String {
    let mut out = String::from("Decision boundaries (p = 0.5):\n");
    if outcomes.is_empty() {
        out.push_str("  (no univariate model fitted)\n");
    }
    for o in outcomes {
        match &o.result {
            Ok(b) => out.push_str(&format!(
                "  {}: {} = {:.3} {}\n",
                o.kind.display_name(),
                b.predictor.column(),
                b.value,
                b.predictor.unit()
            )),
            Err(e) => out.push_str(&format!("  {}: {e}\n", o.kind.display_name())),
        }
    }
    out
}

/// Velocity-model boundary only, e.g. for `whiff models` scripting output.
pub fn format_velocity_boundary(outcomes: &[BoundaryOutcome]) -> String {
    match outcomes.iter().find(|o| o.kind == ModelKind::Velocity) {
        Some(BoundaryOutcome { result: Ok(b), .. }) => format!("boundary_release_speed={:.6}", b.value),
        Some(BoundaryOutcome { result: Err(e), .. }) => format!("boundary_release_speed=NA ({e})"),
        None => "boundary_release_speed=NA (model V not fitted)".to_string(),
    }
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "NA".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AnalysisRecord, Boundary, Predictor};
    use crate::error::ModelError;
    use crate::fit::{FitOptions, fit_suite, suite_boundaries};

    fn suite() -> ModelSuite {
        let speeds = [88.0, 90.0, 91.0, 92.0, 93.0, 94.0, 95.0, 96.0, 97.0, 99.0];
        let whiffs = [false, false, true, false, false, true, false, true, true, true];
        let records: Vec<AnalysisRecord> = (0..10)
            .map(|i| AnalysisRecord::new(whiffs[i], Some(speeds[i]), None))
            .collect();
        fit_suite(&records, &FitOptions::default())
    }

    #[test]
    fn model_table_lists_terms_of_fitted_models() {
        let s = format_model_table(&suite());
        assert!(s.contains("V : response ~ release_speed"));
        assert!(s.contains("(intercept)"));
        assert!(s.contains("iterations="));
        assert!(!s.contains("C : "));
    }

    #[test]
    fn failures_and_boundaries_are_listed() {
        let suite = suite();
        let failures = format_failures(&suite.failures());
        assert!(failures.contains("S: "));
        assert!(failures.contains("C: "));

        let b = format_boundaries(&suite_boundaries(&suite));
        assert!(b.contains("V: release_speed = "));
        assert!(b.contains("mph"));
        assert!(format_velocity_boundary(&suite_boundaries(&suite)).starts_with("boundary_release_speed=9"));
    }

    #[test]
    fn run_summary_shows_rows_read_and_kept() {
        use crate::io::ingest::read_pitches;
        use std::path::PathBuf;

        let pitches = read_pitches("description,release_speed\nball,95\nfoul,93\n".as_bytes(), "p.csv").unwrap();
        // The invalid UTF-8 row is read but cannot be parsed.
        let swings = read_pitches(
            &b"description,release_speed\nfoul,95\n\xff\xfe,90\nswinging_strike,97\n"[..],
            "s.csv",
        )
        .unwrap();
        let config = FitConfig {
            pitches_csv: PathBuf::from("p.csv"),
            swings_csv: PathBuf::from("s.csv"),
            max_iter: 25,
            tolerance: 1e-8,
            top_n: 10,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_predictions: None,
            export_models: None,
            svg_dir: None,
        };

        let s = format_run_summary(&pitches, &swings, 2, &config);
        assert!(s.contains("All pitches : p.csv (2 of 2 rows kept)"), "{s}");
        assert!(s.contains("Swung at    : s.csv (2 of 3 rows kept)"), "{s}");
    }

    #[test]
    fn failures_are_grouped_into_input_and_fit_problems() {
        let failures = [
            ModelFailure {
                kind: ModelKind::Spin,
                message: "missing column".to_string(),
                fit_failure: false,
            },
            ModelFailure {
                kind: ModelKind::Combined,
                message: "did not converge".to_string(),
                fit_failure: true,
            },
        ];
        let s = format_failures(&failures);
        assert_eq!(
            s,
            "Model input problems:\n  S: missing column\nModel fit failures:\n  C: did not converge\n"
        );
        assert!(!format_failures(&failures[1..]).contains("input problems"));
    }

    #[test]
    fn degenerate_boundary_is_reported() {
        let outcomes = [
            BoundaryOutcome {
                kind: ModelKind::Velocity,
                result: Err(ModelError::DegenerateBoundary),
            },
            BoundaryOutcome {
                kind: ModelKind::Spin,
                result: Ok(Boundary {
                    kind: ModelKind::Spin,
                    predictor: Predictor::ReleaseSpinRate,
                    value: 2334.5,
                }),
            },
        ];
        let s = format_boundaries(&outcomes);
        assert!(s.contains("V: "));
        assert!(s.contains("release_spin_rate = 2334.500 rpm"));
        assert!(format_velocity_boundary(&outcomes).contains("NA"));
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("Cole, Gerrit", 24), "Cole, Gerrit");
        assert_eq!(truncate("abcdef", 4), "abc.");
    }

    #[test]
    fn fmt_opt_prints_na() {
        assert_eq!(fmt_opt(None, 2), "NA");
        assert_eq!(fmt_opt(Some(93.456), 1), "93.5");
    }
}
