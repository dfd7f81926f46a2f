//! Tests for shared data types

use crate::types::{LabeledDataPoint, RawDataPoint};

#[test]
fn test_raw_data_point_parses_camel_case() {
    let json = r#"{
        "inputs": {"oddsMid": 0.62, "fgi": "55", "liquidity": 120000},
        "label": true,
        "timestamp": "2025-05-01T10:00:00Z",
        "sourceId": "poly:abc123",
        "maturityDate": "2025-05-08T10:00:00Z"
    }"#;
    let point: RawDataPoint = serde_json::from_str(json).unwrap();
    assert!(point.label);
    assert_eq!(point.source_id, "poly:abc123");
    assert_eq!(point.inputs.len(), 3);
}

#[test]
fn test_labeled_point_normalizes_inputs() {
    let json = r#"{
        "inputs": {"oddsMid": 0.9, "fgi": null},
        "label": false,
        "timestamp": "2025-05-01T10:00:00Z",
        "sourceId": "poly:abc123",
        "maturityDate": "2025-05-08T10:00:00Z"
    }"#;
    let raw: RawDataPoint = serde_json::from_str(json).unwrap();
    let labeled = LabeledDataPoint::from(&raw);
    assert_eq!(labeled.features.odds_mid, 1.0);
    // null fgi recovers to the neutral midpoint
    assert_eq!(labeled.features.fgi, 0.5);
    assert!(!labeled.label);
    assert_eq!(labeled.maturity_date, raw.maturity_date);
}

#[test]
fn test_dataset_array_round_trip() {
    let json = r#"[
        {"inputs": {}, "label": true, "timestamp": "2025-05-01T10:00:00Z",
         "sourceId": "a", "maturityDate": "2025-05-02T10:00:00Z"},
        {"inputs": {"fgi": 80}, "label": false, "timestamp": "2025-05-01T11:00:00Z",
         "sourceId": "b", "maturityDate": "2025-05-02T11:00:00Z"}
    ]"#;
    let points: Vec<RawDataPoint> = serde_json::from_str(json).unwrap();
    assert_eq!(points.len(), 2);
    let back = serde_json::to_string(&points).unwrap();
    let again: Vec<RawDataPoint> = serde_json::from_str(&back).unwrap();
    assert_eq!(again[1].inputs["fgi"], serde_json::json!(80));
}
