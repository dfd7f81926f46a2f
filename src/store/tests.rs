use super::*;
use crate::error::EngineError;
use crate::platt::{PlattMetadata, PlattScaling};
use crate::trainer::{LogisticModel, ModelMetadata};
use crate::types::TrainingStep;
use chrono::{TimeZone, Utc};

fn sample_model() -> LogisticModel {
    LogisticModel {
        coefficients: vec![0.25, -1.5, 0.0, 2.75, -0.125, 1.0, 0.5, -0.33],
        bias: -0.42,
        training_history: vec![
            TrainingStep {
                iteration: 0,
                loss: 0.6931,
                accuracy: 0.5,
            },
            TrainingStep {
                iteration: 1,
                loss: 0.58,
                accuracy: 0.75,
            },
        ],
        metadata: ModelMetadata {
            trained_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap(),
            training_samples: 128,
            convergence_iterations: 57,
        },
    }
}

fn sample_scaling() -> PlattScaling {
    PlattScaling {
        a: 1.31,
        b: -0.17,
        metadata: PlattMetadata {
            trained_at: Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap(),
            holdout_samples: 25,
            original_brier_score: 0.21,
            calibrated_brier_score: 0.185,
            improvement: 0.025,
        },
    }
}

#[test]
fn test_model_round_trip_preserves_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let model = sample_model();

    save_model(&model, &path).unwrap();
    let loaded = load_model(&path).unwrap();

    assert_eq!(loaded.coefficients, model.coefficients);
    assert_eq!(loaded.bias, model.bias);
    assert_eq!(loaded.training_history, model.training_history);
    assert_eq!(loaded.metadata.trained_at, model.metadata.trained_at);
    assert_eq!(loaded.metadata.training_samples, 128);
    assert_eq!(loaded.metadata.convergence_iterations, 57);
}

#[test]
fn test_model_file_schema_is_camel_case_with_feature_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    save_model(&sample_model(), &path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["featureNames"].as_array().unwrap().len(), 8);
    assert_eq!(raw["featureNames"][0], "odds_mid");
    assert!(raw["metadata"]["trainedAt"].is_string());
    assert!(raw["metadata"]["convergenceIterations"].is_number());
    assert!(raw["trainingHistory"].is_array());
}

#[test]
fn test_scaling_round_trip_preserves_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("platt.json");
    let scaling = sample_scaling();

    save_scaling(&scaling, &path).unwrap();
    let loaded = load_scaling(&path).unwrap();

    assert_eq!(loaded.a, scaling.a);
    assert_eq!(loaded.b, scaling.b);
    assert_eq!(loaded.metadata.trained_at, scaling.metadata.trained_at);
    assert_eq!(loaded.metadata.holdout_samples, 25);
    assert_eq!(loaded.metadata.original_brier_score, 0.21);
    assert_eq!(loaded.metadata.calibrated_brier_score, 0.185);
    assert_eq!(loaded.metadata.improvement, 0.025);
}

#[test]
fn test_trained_at_is_iso_8601() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("platt.json");
    save_scaling(&sample_scaling(), &path).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let stamp = raw["metadata"]["trainedAt"].as_str().unwrap();
    assert!(stamp.starts_with("2025-06-02T08:00:00"));
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
}

#[test]
fn test_malformed_json_propagates_as_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_model(&path), Err(EngineError::Json(_))));
}

#[test]
fn test_missing_file_propagates_as_io_error() {
    assert!(matches!(
        load_model("/nonexistent/model.json"),
        Err(EngineError::Io(_))
    ));
}
