//! Calibration evaluation
//!
//! Brier score, log loss, accuracy, and a binned reliability diagram with
//! Wilson confidence intervals plus the Murphy
//! reliability/resolution/uncertainty decomposition of the Brier score.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::trainer::PROB_EPSILON;


/// Default number of equal-width reliability bins
pub const DEFAULT_BINS: usize = 10;

/// z for a 95% Wilson score interval
const WILSON_Z: f64 = 1.96;

/// Calibration gap above which a bin is flagged for monitoring
const ANOMALY_GAP: f64 = 0.1;

/// One reliability-diagram bin over the half-open range [start, end).
/// Recomputed per evaluation call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityBin {
    pub index: usize,
    pub range_start: f64,
    pub range_end: f64,
    pub count: usize,
    pub mean_prediction: f64,
    pub mean_outcome: f64,
    /// Wilson score interval on the empirical frequency, clamped to [0,1]
    pub wilson_low: f64,
    pub wilson_high: f64,
    /// Calibration-drift flag: large prediction/outcome gap, or the mean
    /// prediction falls outside the bin's own Wilson interval
    pub flagged: bool,
}

/// Aggregate metrics for one evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalResult {
    pub brier_score: f64,
    pub log_loss: f64,
    pub accuracy: f64,
    /// Murphy decomposition terms; Brier ≈ reliability - resolution + uncertainty
    pub reliability: f64,
    pub resolution: f64,
    pub uncertainty: f64,
    pub bins: Vec<ReliabilityBin>,
}

/// Mean squared error between predicted probability and {0,1}-coded outcome
pub fn brier_score(predictions: &[f64], outcomes: &[bool]) -> f64 {
    let total: f64 = predictions
        .iter()
        .zip(outcomes.iter())
        .map(|(&p, &y)| {
            let y = if y { 1.0 } else { 0.0 };
            (p - y) * (p - y)
        })
        .sum();
    total / predictions.len() as f64
}

/// Mean binary cross-entropy, with p clamped away from exact 0/1
pub fn log_loss(predictions: &[f64], outcomes: &[bool]) -> f64 {
    let total: f64 = predictions
        .iter()
        .zip(outcomes.iter())
        .map(|(&p, &y)| {
            let p = p.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
            if y {
                -p.ln()
            } else {
                -(1.0 - p).ln()
            }
        })
        .sum();
    total / predictions.len() as f64
}

/// Wilson score interval for `successes` out of `n`, clamped to [0,1].
///
/// Used instead of the naive normal approximation because it stays bounded
/// and is well-behaved at small per-bin sample counts.
pub fn wilson_interval(successes: usize, n: usize) -> (f64, f64) {
    if n == 0 {
        return (0.0, 1.0);
    }
    let n = n as f64;
    let p = successes as f64 / n;
    let z2 = WILSON_Z * WILSON_Z;
    let denom = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denom;
    let margin = WILSON_Z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt() / denom;
    ((center - margin).clamp(0.0, 1.0), (center + margin).clamp(0.0, 1.0))
}

/// Evaluate calibrated predictions against matured outcomes.
///
/// Partitions [0,1] into `n_bins` equal-width half-open bins (the final
/// bin is closed at 1.0) and computes the full metric set. Empty or
/// length-mismatched inputs are rejected.
pub fn evaluate(predictions: &[f64], outcomes: &[bool], n_bins: usize) -> Result<EvalResult> {
    if predictions.is_empty() || predictions.len() != outcomes.len() {
        return Err(EngineError::InvalidInput(format!(
            "evaluation arrays must be non-empty and equal length (got {} predictions, {} outcomes)",
            predictions.len(),
            outcomes.len()
        )));
    }
    if n_bins == 0 {
        return Err(EngineError::InvalidInput(
            "reliability diagram needs at least one bin".into(),
        ));
    }

    let total = predictions.len();
    let total_f = total as f64;
    let positives = outcomes.iter().filter(|&&y| y).count();
    let overall_rate = positives as f64 / total_f;

    let mut counts = vec![0usize; n_bins];
    let mut successes = vec![0usize; n_bins];
    let mut sum_predictions = vec![0.0f64; n_bins];
    for (&p, &y) in predictions.iter().zip(outcomes.iter()) {
        let idx = ((p * n_bins as f64).floor() as usize).min(n_bins - 1);
        counts[idx] += 1;
        sum_predictions[idx] += p;
        if y {
            successes[idx] += 1;
        }
    }

    let width = 1.0 / n_bins as f64;
    let mut bins = Vec::with_capacity(n_bins);
    let mut reliability = 0.0;
    let mut resolution = 0.0;
    for index in 0..n_bins {
        let count = counts[index];
        let (mean_prediction, mean_outcome) = if count > 0 {
            (
                sum_predictions[index] / count as f64,
                successes[index] as f64 / count as f64,
            )
        } else {
            (0.0, 0.0)
        };
        let (wilson_low, wilson_high) = wilson_interval(successes[index], count);

        if count > 0 {
            let weight = count as f64 / total_f;
            let gap = mean_prediction - mean_outcome;
            reliability += weight * gap * gap;
            let spread = mean_outcome - overall_rate;
            resolution += weight * spread * spread;
        }

        let flagged = count > 0
            && ((mean_prediction - mean_outcome).abs() > ANOMALY_GAP
                || mean_prediction < wilson_low
                || mean_prediction > wilson_high);

        bins.push(ReliabilityBin {
            index,
            range_start: index as f64 * width,
            range_end: (index + 1) as f64 * width,
            count,
            mean_prediction,
            mean_outcome,
            wilson_low,
            wilson_high,
            flagged,
        });
    }

    let accuracy = predictions
        .iter()
        .zip(outcomes.iter())
        .filter(|&(&p, &y)| (p >= 0.5) == y)
        .count() as f64
        / total_f;

    Ok(EvalResult {
        brier_score: brier_score(predictions, outcomes),
        log_loss: log_loss(predictions, outcomes),
        accuracy,
        reliability,
        resolution,
        uncertainty: overall_rate * (1.0 - overall_rate),
        bins,
    })
}
