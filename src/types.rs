//! Shared data types for training and evaluation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::features::FeatureVector;

/// A matured outcome attached to the features that were observed when the
/// prediction was made. Supplied externally; read-only input to training
/// and evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledDataPoint {
    pub features: FeatureVector,
    /// True when the proposition resolved YES
    pub label: bool,
    pub timestamp: DateTime<Utc>,
    pub source_id: String,
    pub maturity_date: DateTime<Utc>,
}

/// Dataset file entry: raw named signals plus the matured outcome.
/// The `inputs` map is keyed by camelCase signal names and may contain
/// malformed values; normalization is total over them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataPoint {
    pub inputs: BTreeMap<String, Value>,
    pub label: bool,
    pub timestamp: DateTime<Utc>,
    pub source_id: String,
    pub maturity_date: DateTime<Utc>,
}

impl From<&RawDataPoint> for LabeledDataPoint {
    fn from(raw: &RawDataPoint) -> Self {
        Self {
            features: crate::features::create_feature_vector(&raw.inputs),
            label: raw.label,
            timestamp: raw.timestamp,
            source_id: raw.source_id.clone(),
            maturity_date: raw.maturity_date,
        }
    }
}

/// One recorded gradient-descent iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingStep {
    pub iteration: usize,
    pub loss: f64,
    pub accuracy: f64,
}
