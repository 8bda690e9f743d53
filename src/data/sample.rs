//! Synthetic swung-at pitch generation.
//!
//! Produces a Savant-like four-seam dataset with a known whiff model so the
//! pipeline can be exercised without real data:
//!
//! - each pitcher gets a mean velocity and spin rate
//! - each pitch jitters around its pitcher's means
//! - the whiff is drawn from `inverse_logit(β0 + β1·speed + β2·spin)`
//! - whiffs become `swinging_strike` / `foul_tip`, contact `foul` / `hit_into_play`

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::PitchRecord;
use crate::error::AppError;
use crate::math::inverse_logit;

/// Share of whiffs recorded as foul tips.
const FOUL_TIP_SHARE: f64 = 0.1;
/// Season window for generated game dates.
const SEASON_DAYS: i64 = 180;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
    pub pitchers: usize,
    /// True model coefficients `[β0, β_speed, β_spin]`.
    pub coefficients: [f64; 3],
    /// Probability that a pitch has no spin rate recorded.
    pub missing_spin_rate: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            count: 2000,
            seed: 42,
            pitchers: 25,
            coefficients: [-15.4, 0.12, 0.0012],
            missing_spin_rate: 0.01,
        }
    }
}

/// Generate a deterministic synthetic swung-at dataset.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<PitchRecord>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }
    if config.pitchers == 0 {
        return Err(AppError::new(2, "Pitcher count must be > 0."));
    }
    if !(0.0..1.0).contains(&config.missing_spin_rate) {
        return Err(AppError::new(2, "Missing spin rate must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let dist = |mean: f64, sd: f64| {
        Normal::new(mean, sd).map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))
    };
    let league_velo = dist(94.0, 1.5)?;
    let league_spin = dist(2290.0, 100.0)?;
    let pitch_velo = dist(0.0, 0.8)?;
    let pitch_spin = dist(0.0, 45.0)?;

    let pitchers: Vec<(String, f64, f64)> = (0..config.pitchers)
        .map(|i| {
            (
                format!("Pitcher, {:02}", i + 1),
                league_velo.sample(&mut rng),
                league_spin.sample(&mut rng),
            )
        })
        .collect();

    let opening_day = NaiveDate::from_ymd_opt(2023, 3, 30)
        .ok_or_else(|| AppError::new(4, "Invalid opening day."))?;
    let [b0, b_speed, b_spin] = config.coefficients;

    let mut out = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let (name, velo, spin) = &pitchers[rng.gen_range(0..pitchers.len())];
        let speed = round_to(velo + pitch_velo.sample(&mut rng), 1);
        let spin_rate = (spin + pitch_spin.sample(&mut rng)).round();

        let p = inverse_logit(b0 + b_speed * speed + b_spin * spin_rate);
        let whiff = rng.r#gen::<f64>() < p;
        let description = if whiff {
            if rng.r#gen::<f64>() < FOUL_TIP_SHARE {
                "foul_tip"
            } else {
                "swinging_strike"
            }
        } else if rng.r#gen::<bool>() {
            "foul"
        } else {
            "hit_into_play"
        };

        let missing_spin = rng.r#gen::<f64>() < config.missing_spin_rate;
        let game_date = opening_day
            .checked_add_signed(Duration::days(rng.gen_range(0..SEASON_DAYS)))
            .unwrap_or(opening_day);

        out.push(PitchRecord {
            description: Some(description.to_string()),
            release_speed: Some(speed),
            release_spin_rate: (!missing_spin).then_some(spin_rate),
            player_name: Some(name.clone()),
            pitch_type: Some("FF".to_string()),
            game_date: Some(game_date),
        });
    }

    Ok(out)
}

fn round_to(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}
