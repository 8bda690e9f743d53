//! Descriptive dataset summaries: outcome frequencies, predictor statistics
//! by outcome, and a per-pitcher table.

use std::collections::HashMap;

use crate::domain::{LabeledPitch, PitchRecord, Predictor};

/// Label used for rows without a description.
pub const MISSING_DESCRIPTION: &str = "(missing)";

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionCount {
    pub description: String,
    pub count: usize,
    pub share: f64,
}

/// Summary statistics of one numeric column. `mean`/`sd`/`min`/`max` are
/// `None` when no value is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub n: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub sd: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeGroup {
    pub result: bool,
    pub count: usize,
    pub speed: ColumnStats,
    pub spin: ColumnStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeSummary {
    pub swings: usize,
    pub whiffs: usize,
    pub whiff_rate: f64,
    /// Whiff group first, then contact.
    pub groups: [OutcomeGroup; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct PitcherRow {
    pub name: String,
    pub swings: usize,
    pub whiffs: usize,
    pub whiff_rate: f64,
    pub mean_speed: Option<f64>,
    pub mean_spin: Option<f64>,
}

/// Frequency of each raw description, most frequent first (ties by name).
pub fn description_counts(pitches: &[PitchRecord]) -> Vec<DescriptionCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in pitches {
        let d = p.description.as_deref().unwrap_or(MISSING_DESCRIPTION);
        *counts.entry(d).or_default() += 1;
    }

    let total = pitches.len().max(1) as f64;
    let mut out: Vec<DescriptionCount> = counts
        .into_iter()
        .map(|(d, count)| DescriptionCount {
            description: d.to_string(),
            count,
            share: count as f64 / total,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.description.cmp(&b.description)));
    out
}

/// Whiff rate and predictor statistics split by outcome.
pub fn summarize_outcomes(labeled: &[LabeledPitch]) -> OutcomeSummary {
    let group = |result: bool| {
        let rows: Vec<&PitchRecord> = labeled
            .iter()
            .filter(|l| l.result == result)
            .map(|l| &l.pitch)
            .collect();
        OutcomeGroup {
            result,
            count: rows.len(),
            speed: column_stats(rows.iter().map(|p| value(p, Predictor::ReleaseSpeed))),
            spin: column_stats(rows.iter().map(|p| value(p, Predictor::ReleaseSpinRate))),
        }
    };

    let whiff = group(true);
    let contact = group(false);
    let swings = labeled.len();
    let whiffs = whiff.count;

    OutcomeSummary {
        swings,
        whiffs,
        whiff_rate: rate(whiffs, swings),
        groups: [whiff, contact],
    }
}

/// Per-pitcher swings, whiffs and mean predictors; most swings first, top `top_n`.
pub fn pitcher_table(labeled: &[LabeledPitch], top_n: usize) -> Vec<PitcherRow> {
    let mut by_name: HashMap<&str, Vec<&LabeledPitch>> = HashMap::new();
    for l in labeled {
        if let Some(name) = l.pitch.player_name.as_deref() {
            by_name.entry(name).or_default().push(l);
        }
    }

    let mut rows: Vec<PitcherRow> = by_name
        .into_iter()
        .map(|(name, pitches)| {
            let swings = pitches.len();
            let whiffs = pitches.iter().filter(|l| l.result).count();
            PitcherRow {
                name: name.to_string(),
                swings,
                whiffs,
                whiff_rate: rate(whiffs, swings),
                mean_speed: column_stats(pitches.iter().map(|l| value(&l.pitch, Predictor::ReleaseSpeed))).mean,
                mean_spin: column_stats(pitches.iter().map(|l| value(&l.pitch, Predictor::ReleaseSpinRate))).mean,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.swings.cmp(&a.swings).then_with(|| a.name.cmp(&b.name)));
    rows.truncate(top_n);
    rows
}

fn value(p: &PitchRecord, predictor: Predictor) -> Option<f64> {
    let v = match predictor {
        Predictor::ReleaseSpeed => p.release_speed,
        Predictor::ReleaseSpinRate => p.release_spin_rate,
    }?;
    v.is_finite().then_some(v)
}

fn rate(k: usize, n: usize) -> f64 {
    if n == 0 { 0.0 } else { k as f64 / n as f64 }
}

fn column_stats(values: impl Iterator<Item = Option<f64>>) -> ColumnStats {
    let mut present = Vec::new();
    let mut missing = 0usize;
    for v in values {
        match v {
            Some(v) => present.push(v),
            None => missing += 1,
        }
    }

    let n = present.len();
    if n == 0 {
        return ColumnStats {
            n,
            missing,
            mean: None,
            sd: None,
            min: None,
            max: None,
        };
    }

    let mean = present.iter().sum::<f64>() / n as f64;
    // Sample standard deviation; undefined for a single value.
    let sd = (n > 1).then(|| {
        let ss: f64 = present.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n as f64 - 1.0)).sqrt()
    });

    ColumnStats {
        n,
        missing,
        mean: Some(mean),
        sd,
        min: present.iter().copied().reduce(f64::min),
        max: present.iter().copied().reduce(f64::max),
    }
}
