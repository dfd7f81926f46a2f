//! Stateless inference over a trained logistic model

use std::collections::BTreeMap;

use crate::features::{FeatureVector, FEATURE_NAMES};
use crate::trainer::{linear_score, sigmoid, LogisticModel, PROB_EPSILON};


/// Raw YES probabilities for a batch of feature vectors.
///
/// Pure forward pass with no side effects. Outputs are clamped strictly
/// inside (0,1) so downstream logit/log-loss math stays finite.
pub fn predict_proba(model: &LogisticModel, x: &[FeatureVector]) -> Vec<f64> {
    x.iter()
        .map(|features| {
            sigmoid(linear_score(&model.coefficients, model.bias, features))
                .clamp(PROB_EPSILON, 1.0 - PROB_EPSILON)
        })
        .collect()
}

/// Hard classifications: [`predict_proba`] thresholded at 0.5
pub fn predict(model: &LogisticModel, x: &[FeatureVector]) -> Vec<bool> {
    predict_proba(model, x).into_iter().map(|p| p >= 0.5).collect()
}

/// Absolute coefficient magnitude keyed by feature name.
///
/// Valid as a relative ranking only because all features share the same
/// [0,1] normalized scale by construction. Not a causal or statistically
/// corrected importance measure.
pub fn feature_importance(model: &LogisticModel) -> BTreeMap<String, f64> {
    FEATURE_NAMES
        .iter()
        .zip(model.coefficients.iter())
        .map(|(name, coef)| (name.to_string(), coef.abs()))
        .collect()
}
