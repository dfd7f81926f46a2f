//! Logistic regression trainer
//!
//! From-scratch full-batch gradient descent with L2 regularization on the
//! coefficients (never the bias). Fits a linear-in-logit model over
//! normalized feature vectors and records per-iteration loss/accuracy for
//! observability.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::types::TrainingStep;


/// Probability floor/ceiling used wherever a probability feeds a logarithm
pub(crate) const PROB_EPSILON: f64 = 1e-15;

/// Training hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Gradient step size
    pub learning_rate: f64,
    /// Hard cap on gradient-descent iterations
    pub max_iterations: usize,
    /// Minimum loss delta to keep iterating
    pub convergence_threshold: f64,
    /// L2 penalty weight on coefficients (bias is unpenalized)
    pub regularization: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            max_iterations: 1000,
            convergence_threshold: 1e-6,
            regularization: 0.01,
        }
    }
}

/// Fit provenance recorded alongside the model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetadata {
    pub trained_at: DateTime<Utc>,
    pub training_samples: usize,
    pub convergence_iterations: usize,
}

/// A trained logistic model. Created once by [`fit`]; inference-only
/// thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticModel {
    /// One coefficient per feature, canonical [`crate::features::FEATURE_NAMES`] order
    pub coefficients: Vec<f64>,
    pub bias: f64,
    /// Append-only record of every training iteration
    pub training_history: Vec<TrainingStep>,
    pub metadata: ModelMetadata,
}

/// Sigmoid with the input clamped to [-500, 500] to avoid overflow in `exp`
pub(crate) fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-500.0, 500.0);
    1.0 / (1.0 + (-z).exp())
}

pub(crate) fn linear_score(coefficients: &[f64], bias: f64, features: &FeatureVector) -> f64 {
    let values = features.as_array();
    let mut z = bias;
    for (coef, value) in coefficients.iter().zip(values.iter()) {
        z += coef * value;
    }
    z
}

fn mean_log_loss(predictions: &[f64], labels: &[bool]) -> f64 {
    let mut total = 0.0;
    for (&p, &y) in predictions.iter().zip(labels.iter()) {
        let p = p.clamp(PROB_EPSILON, 1.0 - PROB_EPSILON);
        total += if y { -p.ln() } else { -(1.0 - p).ln() };
    }
    total / predictions.len() as f64
}

fn training_accuracy(predictions: &[f64], labels: &[bool]) -> f64 {
    let correct = predictions
        .iter()
        .zip(labels.iter())
        .filter(|&(&p, &y)| (p >= 0.5) == y)
        .count();
    correct as f64 / predictions.len() as f64
}

/// Fit a logistic model, reporting progress through `tracing`
pub fn fit(x: &[FeatureVector], y: &[bool], config: &TrainConfig) -> Result<LogisticModel> {
    fit_with_observer(x, y, config, |iteration, loss, accuracy| {
        if iteration % 100 == 0 {
            tracing::debug!(iteration, loss, accuracy, "training step");
        }
    })
}

/// Fit a logistic model with an injected per-iteration observer.
///
/// `on_step(iteration, loss, accuracy)` fires once per gradient-descent
/// iteration; it decouples the numeric core from any particular logging
/// sink.
pub fn fit_with_observer(
    x: &[FeatureVector],
    y: &[bool],
    config: &TrainConfig,
    mut on_step: impl FnMut(usize, f64, f64),
) -> Result<LogisticModel> {
    if x.is_empty() || x.len() != y.len() {
        return Err(EngineError::InvalidInput(format!(
            "training arrays must be non-empty and equal length (got {} features, {} labels)",
            x.len(),
            y.len()
        )));
    }

    let n = x.len() as f64;
    let mut coefficients = vec![0.0f64; FEATURE_COUNT];
    let mut bias = 0.0f64;
    let mut history = Vec::new();
    let mut previous_loss = f64::INFINITY;
    let mut stopped_at = config.max_iterations;

    for iteration in 0..config.max_iterations {
        let predictions: Vec<f64> = x
            .iter()
            .map(|features| sigmoid(linear_score(&coefficients, bias, features)))
            .collect();

        let loss = mean_log_loss(&predictions, y);
        let accuracy = training_accuracy(&predictions, y);
        history.push(TrainingStep {
            iteration,
            loss,
            accuracy,
        });
        on_step(iteration, loss, accuracy);

        let mut grad_coefficients = [0.0f64; FEATURE_COUNT];
        let mut grad_bias = 0.0f64;
        for ((features, &p), &label) in x.iter().zip(predictions.iter()).zip(y.iter()) {
            let error = p - if label { 1.0 } else { 0.0 };
            let values = features.as_array();
            for j in 0..FEATURE_COUNT {
                grad_coefficients[j] += error * values[j];
            }
            grad_bias += error;
        }
        for j in 0..FEATURE_COUNT {
            let grad = grad_coefficients[j] / n + config.regularization * coefficients[j];
            coefficients[j] -= config.learning_rate * grad;
        }
        bias -= config.learning_rate * (grad_bias / n);

        if (previous_loss - loss).abs() < config.convergence_threshold {
            stopped_at = iteration;
            break;
        }
        previous_loss = loss;
    }

    let final_step = history.last().copied();
    tracing::info!(
        samples = x.len(),
        iterations = stopped_at,
        final_loss = final_step.map(|s| s.loss),
        final_accuracy = final_step.map(|s| s.accuracy),
        "logistic model trained"
    );

    Ok(LogisticModel {
        coefficients,
        bias,
        training_history: history,
        metadata: ModelMetadata {
            trained_at: Utc::now(),
            training_samples: x.len(),
            convergence_iterations: stopped_at,
        },
    })
}
