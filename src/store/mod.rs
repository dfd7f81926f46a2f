//! JSON artifact persistence
//!
//! Two persisted artifacts, versioned by an opaque id chosen by the
//! caller (never generated here): the model file and the platt file.
//! `trainedAt` is written as ISO-8601 and parsed back into a timestamp on
//! load. No schema validation beyond deserialization; malformed JSON
//! propagates to the caller, who owns retry/fallback policy.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::features::FEATURE_NAMES;
use crate::platt::PlattScaling;
use crate::trainer::LogisticModel;

#[cfg(test)]
mod tests;

/// On-disk model schema: the trained model plus the canonical feature
/// ordering, so a consumer can bind coefficients to names without this
/// crate's source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFile {
    pub coefficients: Vec<f64>,
    pub bias: f64,
    pub feature_names: Vec<String>,
    pub training_history: Vec<crate::types::TrainingStep>,
    pub metadata: crate::trainer::ModelMetadata,
}

impl From<&LogisticModel> for ModelFile {
    fn from(model: &LogisticModel) -> Self {
        Self {
            coefficients: model.coefficients.clone(),
            bias: model.bias,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            training_history: model.training_history.clone(),
            metadata: model.metadata.clone(),
        }
    }
}

impl From<ModelFile> for LogisticModel {
    fn from(file: ModelFile) -> Self {
        Self {
            coefficients: file.coefficients,
            bias: file.bias,
            training_history: file.training_history,
            metadata: file.metadata,
        }
    }
}

/// Write a model artifact as pretty-printed JSON
pub fn save_model(model: &LogisticModel, path: impl AsRef<Path>) -> Result<()> {
    let file = ModelFile::from(model);
    fs::write(path, serde_json::to_string_pretty(&file)?)?;
    Ok(())
}

/// Load a model artifact, parsing `trainedAt` back into a timestamp.
/// No schema validation beyond deserialization.
pub fn load_model(path: impl AsRef<Path>) -> Result<LogisticModel> {
    let file: ModelFile = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(file.into())
}

/// Write a platt artifact as pretty-printed JSON
pub fn save_scaling(scaling: &PlattScaling, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(scaling)?)?;
    Ok(())
}

/// Load a platt artifact
pub fn load_scaling(path: impl AsRef<Path>) -> Result<PlattScaling> {
    Ok(serde_json::from_str(&fs::read_to_string(path)?)?)
}
