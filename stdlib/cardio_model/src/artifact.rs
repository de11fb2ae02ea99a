//! Persisted form of a fitted model.
//!
//! The artifact is a JSON document. `serde_json` is built with
//! `float_roundtrip`, so every `f64` reads back bit-for-bit.

use cardio_data::{FEATURE_COUNT, FEATURE_NAMES};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::ModelError;
use crate::logistic::LogisticRegression;

pub const ARTIFACT_FORMAT: &str = "cardio-logistic-regression";
pub const ARTIFACT_VERSION: u32 = 1;
pub const DEFAULT_MODEL_PATH: &str = "heart_disease_model.json";

/// How the stored model was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingMetadata {
    pub seed: u64,
    pub test_fraction: f64,
    pub c: f64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub iterations: usize,
    pub converged: bool,
    pub test_accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelArtifact {
    pub format: String,
    pub version: u32,
    /// Column order the coefficients are bound to.
    pub feature_names: Vec<String>,
    pub classes: [u8; 2],
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub training: TrainingMetadata,
}

impl ModelArtifact {
    pub fn new(model: &LogisticRegression, training: TrainingMetadata) -> Self {
        Self {
            format: ARTIFACT_FORMAT.to_string(),
            version: ARTIFACT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            classes: [0, 1],
            coefficients: model.coefficients.clone(),
            intercept: model.intercept,
            training,
        }
    }

    pub fn model(&self) -> LogisticRegression {
        LogisticRegression {
            coefficients: self.coefficients.clone(),
            intercept: self.intercept,
        }
    }

    /// Whether the stored feature order is the canonical one.
    pub fn matches_schema(&self) -> bool {
        self.feature_names.len() == FEATURE_COUNT
            && self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .all(|(a, b)| a == b)
    }

    /// Structural checks that do not depend on the feature schema.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.format != ARTIFACT_FORMAT {
            return Err(ModelError::InvalidArtifact(format!(
                "unexpected format '{}'",
                self.format
            )));
        }
        if self.version != ARTIFACT_VERSION {
            return Err(ModelError::InvalidArtifact(format!(
                "unsupported version {}",
                self.version
            )));
        }
        if self.classes != [0, 1] {
            return Err(ModelError::InvalidArtifact(format!(
                "expected binary classes [0, 1], found {:?}",
                self.classes
            )));
        }
        if self.coefficients.len() != self.feature_names.len() {
            return Err(ModelError::InvalidArtifact(format!(
                "{} coefficients for {} features",
                self.coefficients.len(),
                self.feature_names.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::InvalidArtifact(
                "non-finite model parameter".into(),
            ));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        let mut bytes = serde_json::to_vec_pretty(self)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Write the artifact, replacing whatever is at `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        fs::write(path, self.to_bytes()?).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("model artifact written to {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ModelError::ArtifactNotFound(path.to_path_buf())
            } else {
                ModelError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_bytes(&bytes)
    }
}
