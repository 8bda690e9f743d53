//! Numerically stable logistic transforms.
//!
//! - `inverse_logit(η) = 1 / (1 + exp(-η))`
//! - `softplus(η) = ln(1 + exp(η))`
//!
//! Numerical notes:
//! - For `η < 0` we evaluate `exp(η) / (1 + exp(η))` so `exp` never sees a large
//!   positive argument (no overflow for very negative η).
//! - `softplus` is split the same way and uses `ln_1p` to keep precision when
//!   `exp(-|η|)` is tiny. The Bernoulli log-likelihood is written in terms of it:
//!   `ln p = -softplus(-η)`, `ln(1-p) = -softplus(η)`.

/// Inverse logit (logistic sigmoid).
pub fn inverse_logit(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}

/// Log-odds of a probability in `(0, 1)`.
pub fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// `ln(1 + exp(x))` without overflow.
pub fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Bernoulli deviance contribution `-2 ln L_i` for a 0/1 response at linear predictor `η`.
pub fn bernoulli_deviance(y: f64, eta: f64) -> f64 {
    2.0 * (y * softplus(-eta) + (1.0 - y) * softplus(eta))
}
