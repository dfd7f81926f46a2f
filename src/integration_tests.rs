//! End-to-end pipeline tests: normalize → fit → predict → calibrate → evaluate

use serde_json::json;
use std::collections::BTreeMap;

use crate::eval::evaluate;
use crate::features::{create_feature_vector, FeatureVector};
use crate::platt::{calibrate_probabilities, fit_platt_scaling, PlattConfig};
use crate::predictor::{feature_importance, predict_proba};
use crate::store::{load_model, load_scaling, save_model, save_scaling};
use crate::trainer::{fit, TrainConfig};

/// Synthetic market history where the mid odds carry all the signal
fn synthetic_dataset(n: usize) -> (Vec<FeatureVector>, Vec<bool>) {
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let odds = 0.1 + 0.8 * (i as f64 / (n - 1) as f64);
        let mut inputs = BTreeMap::new();
        inputs.insert("oddsMid".to_string(), json!(odds));
        inputs.insert("oddsSpread".to_string(), json!(0.02));
        inputs.insert("liquidity".to_string(), json!(50_000 + i * 1000));
        inputs.insert("fgi".to_string(), json!(40 + (i % 20)));
        x.push(create_feature_vector(&inputs));
        // deterministic noise on 10% of labels
        let noisy = i % 10 == 3;
        y.push((odds > 0.5) != noisy);
    }
    (x, y)
}

#[test]
fn test_full_calibration_pipeline() {
    let (x, y) = synthetic_dataset(200);

    let model = fit(
        &x,
        &y,
        &TrainConfig {
            learning_rate: 0.5,
            max_iterations: 2000,
            convergence_threshold: 1e-9,
            regularization: 0.001,
        },
    )
    .unwrap();
    assert_eq!(model.coefficients.len(), 8);

    let raw = predict_proba(&model, &x);
    assert!(raw.iter().all(|&p| p > 0.0 && p < 1.0));

    let scaling = fit_platt_scaling(
        &raw,
        &y,
        &PlattConfig {
            seed: Some(1),
            ..PlattConfig::default()
        },
    )
    .unwrap();
    let calibrated = calibrate_probabilities(&raw, &scaling);

    let result = evaluate(&calibrated, &y, 10).unwrap();
    assert!(result.brier_score < 0.25, "brier {}", result.brier_score);
    assert!(result.accuracy > 0.7, "accuracy {}", result.accuracy);

    // odds_mid carries the signal, so it should dominate the ranking
    let importance = feature_importance(&model);
    let top = importance
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(name, _)| name.clone())
        .unwrap();
    assert_eq!(top, "odds_mid");
}

#[test]
fn test_artifact_round_trip_through_pipeline() {
    let (x, y) = synthetic_dataset(80);
    let model = fit(&x, &y, &TrainConfig::default()).unwrap();
    let raw = predict_proba(&model, &x);
    let scaling = fit_platt_scaling(
        &raw,
        &y,
        &PlattConfig {
            seed: Some(9),
            ..PlattConfig::default()
        },
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let platt_path = dir.path().join("platt.json");
    save_model(&model, &model_path).unwrap();
    save_scaling(&scaling, &platt_path).unwrap();

    // A downstream consumer loads the (model, scaling) pair and applies
    // predict_proba then calibrate_probabilities in that order
    let loaded_model = load_model(&model_path).unwrap();
    let loaded_scaling = load_scaling(&platt_path).unwrap();
    let reloaded = calibrate_probabilities(&predict_proba(&loaded_model, &x), &loaded_scaling);
    let original = calibrate_probabilities(&raw, &scaling);
    for (a, b) in original.iter().zip(reloaded.iter()) {
        assert!((a - b).abs() < 1e-12);
    }
}

#[test]
fn test_malformed_telemetry_never_crashes_scoring() {
    let mut inputs = BTreeMap::new();
    inputs.insert("oddsMid".to_string(), serde_json::Value::Null);
    inputs.insert("fgi".to_string(), json!("garbage"));
    inputs.insert("liquidity".to_string(), json!([1, 2, 3]));
    let vector = create_feature_vector(&inputs);

    let (x, y) = synthetic_dataset(50);
    let model = fit(&x, &y, &TrainConfig::default()).unwrap();
    let p = predict_proba(&model, &[vector]);
    assert!(p[0] > 0.0 && p[0] < 1.0);
}
