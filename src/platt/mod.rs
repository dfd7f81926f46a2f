//! Platt scaling post-calibration
//!
//! Learns a one-dimensional logit-space affine correction
//! `calibrated = sigmoid(a * logit(raw) + b)` that re-maps raw model
//! probabilities to better-calibrated ones. Fitting minimizes Brier score
//! on a training split; the held-out remainder measures before/after
//! calibration quality without optimistic bias.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::eval::brier_score;
use crate::trainer::{sigmoid, PROB_EPSILON};


/// Minimum samples required to fit a calibration transform
pub const MIN_CALIBRATION_SAMPLES: usize = 10;

/// Floor on the holdout split size
const MIN_HOLDOUT_SAMPLES: usize = 5;

/// Calibration fit parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlattConfig {
    /// Fraction of samples withheld for validation
    pub holdout_ratio: f64,
    pub learning_rate: f64,
    pub max_iterations: usize,
    /// Minimum Brier delta to keep iterating
    pub convergence_threshold: f64,
    /// Explicit shuffle seed; None draws from OS entropy, making repeat
    /// fits on identical inputs produce slightly different (a, b)
    pub seed: Option<u64>,
}

impl Default for PlattConfig {
    fn default() -> Self {
        Self {
            holdout_ratio: 0.2,
            learning_rate: 0.1,
            max_iterations: 1000,
            convergence_threshold: 1e-9,
            seed: None,
        }
    }
}

/// Holdout validation record for a fitted transform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlattMetadata {
    pub trained_at: DateTime<Utc>,
    pub holdout_samples: usize,
    /// Holdout Brier score of the raw model probabilities
    pub original_brier_score: f64,
    /// Holdout Brier score after applying the fitted (a, b)
    pub calibrated_brier_score: f64,
    /// original - calibrated; may be negative, reported as-is so a
    /// calibration regression stays observable
    pub improvement: f64,
}

/// A fitted logit-space affine correction. Identity when a = 1, b = 0.
/// Immutable after fitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlattScaling {
    /// Logit-space scale; the calibration map preserves rank order
    /// whenever a > 0
    pub a: f64,
    /// Logit-space shift
    pub b: f64,
    pub metadata: PlattMetadata,
}

/// `ln(p / (1 - p))` with p clamped to [1e-15, 1 - 1e-15]
pub(crate) fn logit(p: f64) -> f64 {
    let p = p.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
    (p / (1.0 - p)).ln()
}

fn apply(a: f64, b: f64, raw: f64) -> f64 {
    sigmoid(a * logit(raw) + b)
}

/// Fit a Platt transform against matured outcomes.
///
/// Shuffles sample indices, withholds `max(5, floor(n * holdout_ratio))`
/// samples, and runs gradient descent on the remainder minimizing Brier
/// score from the identity initialization a=1, b=0 (calibration starts as
/// a no-op and only deviates if it improves fit).
pub fn fit_platt_scaling(
    raw_probabilities: &[f64],
    outcomes: &[bool],
    config: &PlattConfig,
) -> Result<PlattScaling> {
    let n = raw_probabilities.len();
    if n != outcomes.len() {
        return Err(EngineError::InvalidInput(format!(
            "probability/outcome length mismatch: {} vs {}",
            n,
            outcomes.len()
        )));
    }
    if n < MIN_CALIBRATION_SAMPLES {
        return Err(EngineError::InsufficientData {
            got: n,
            need: MIN_CALIBRATION_SAMPLES,
        });
    }
    // Ratio must leave a non-empty training remainder after the holdout
    if !(config.holdout_ratio > 0.0 && config.holdout_ratio < 1.0) {
        return Err(EngineError::InvalidInput(format!(
            "holdout ratio must be in (0, 1), got {}",
            config.holdout_ratio
        )));
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let holdout_size = MIN_HOLDOUT_SAMPLES.max((n as f64 * config.holdout_ratio).floor() as usize);
    let (holdout_idx, train_idx) = indices.split_at(holdout_size);

    let gather = |idx: &[usize]| -> (Vec<f64>, Vec<bool>) {
        (
            idx.iter().map(|&i| raw_probabilities[i]).collect(),
            idx.iter().map(|&i| outcomes[i]).collect(),
        )
    };
    let (train_probs, train_outcomes) = gather(train_idx);
    let (holdout_probs, holdout_outcomes) = gather(holdout_idx);

    let train_logits: Vec<f64> = train_probs.iter().map(|&p| logit(p)).collect();
    let train_n = train_logits.len() as f64;

    let mut a = 1.0f64;
    let mut b = 0.0f64;
    let mut previous_brier = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        let calibrated: Vec<f64> = train_logits.iter().map(|&l| sigmoid(a * l + b)).collect();
        let current_brier = brier_score(&calibrated, &train_outcomes);

        // d(Brier)/d{a,b} through the sigmoid/logit composition:
        // dp/da = p(1-p) * logit(raw), dp/db = p(1-p)
        let mut grad_a = 0.0f64;
        let mut grad_b = 0.0f64;
        for ((&p, &l), &y) in calibrated
            .iter()
            .zip(train_logits.iter())
            .zip(train_outcomes.iter())
        {
            let y = if y { 1.0 } else { 0.0 };
            let common = 2.0 * (p - y) * p * (1.0 - p);
            grad_a += common * l;
            grad_b += common;
        }
        a -= config.learning_rate * grad_a / train_n;
        b -= config.learning_rate * grad_b / train_n;

        if (previous_brier - current_brier).abs() < config.convergence_threshold {
            tracing::debug!(iteration, brier = current_brier, "platt fit converged");
            break;
        }
        previous_brier = current_brier;
    }

    let original_brier_score = brier_score(&holdout_probs, &holdout_outcomes);
    let recalibrated: Vec<f64> = holdout_probs.iter().map(|&p| apply(a, b, p)).collect();
    let calibrated_brier_score = brier_score(&recalibrated, &holdout_outcomes);
    let improvement = original_brier_score - calibrated_brier_score;

    tracing::info!(
        a,
        b,
        holdout_samples = holdout_size,
        original_brier_score,
        calibrated_brier_score,
        improvement,
        "platt scaling fitted"
    );

    Ok(PlattScaling {
        a,
        b,
        metadata: PlattMetadata {
            trained_at: Utc::now(),
            holdout_samples: holdout_size,
            original_brier_score,
            calibrated_brier_score,
            improvement,
        },
    })
}

/// Apply a fitted transform to arbitrary new probabilities at inference
/// time, independent of the split used to fit it.
pub fn calibrate_probabilities(raw: &[f64], scaling: &PlattScaling) -> Vec<f64> {
    raw.iter().map(|&p| apply(scaling.a, scaling.b, p)).collect()
}
