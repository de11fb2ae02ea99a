//! Inference service owning one loaded model.
//!
//! The artifact is read once; the loaded snapshot sits behind an `Arc` and is
//! never mutated, so `predict(&self)` can be shared across threads. A newer
//! artifact on disk is only picked up by a fresh service.

use cardio_model::{LogisticRegression, ModelArtifact};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ServiceError;
use crate::explain::{explain, Explanation};
use crate::request::PredictionRequest;
use crate::risk::{risk_factors, RiskFactor, RiskTier};

/// Probability at or above which the positive label is returned.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: u8,
    pub probability: f64,
    pub tier: RiskTier,
    /// Empty unless `label == 1`.
    pub risk_factors: Vec<RiskFactor>,
    #[serde(flatten)]
    pub explanation: Explanation,
}

impl Prediction {
    pub fn is_high_risk(&self) -> bool {
        self.label == 1
    }
}

/// An immutable model snapshot.
#[derive(Debug)]
pub struct LoadedModel {
    path: PathBuf,
    artifact: ModelArtifact,
    model: LogisticRegression,
}

impl LoadedModel {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }
}

#[derive(Debug, Clone)]
enum ServiceState {
    Unloaded,
    Ready(Arc<LoadedModel>),
}

#[derive(Debug, Clone)]
pub struct InferenceService {
    state: ServiceState,
}

impl Default for InferenceService {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceService {
    pub fn new() -> Self {
        Self {
            state: ServiceState::Unloaded,
        }
    }

    /// Create a service and load `path` in one step.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let mut service = Self::new();
        service.load(path)?;
        Ok(service)
    }

    /// Load the artifact at `path`. On failure the service stays unloaded.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), ServiceError> {
        if let ServiceState::Ready(_) = self.state {
            return Err(ServiceError::AlreadyLoaded);
        }
        let path = path.as_ref();
        let artifact = ModelArtifact::load(path)?;
        if !artifact.matches_schema() {
            return Err(ServiceError::SchemaMismatch(artifact.feature_names));
        }
        let model = artifact.model();
        info!(
            "loaded model from {} ({} training rows, test accuracy {:.4})",
            path.display(),
            artifact.training.train_rows,
            artifact.training.test_accuracy
        );
        self.state = ServiceState::Ready(Arc::new(LoadedModel {
            path: path.to_path_buf(),
            artifact,
            model,
        }));
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ServiceState::Ready(_))
    }

    /// Shared handle to the loaded snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<LoadedModel>> {
        match &self.state {
            ServiceState::Ready(loaded) => Some(Arc::clone(loaded)),
            ServiceState::Unloaded => None,
        }
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<Prediction, ServiceError> {
        let loaded = match &self.state {
            ServiceState::Ready(loaded) => loaded,
            ServiceState::Unloaded => return Err(ServiceError::NotReady),
        };
        let row = request.to_row();
        let probability = loaded.model.predict_proba(&row);
        let label = u8::from(probability >= DECISION_THRESHOLD);
        let factors = if label == 1 {
            risk_factors(request.features())
        } else {
            Vec::new()
        };
        debug!("prediction: label {label}, probability {probability:.4}");

        Ok(Prediction {
            label,
            probability,
            tier: RiskTier::from_label(label),
            risk_factors: factors,
            explanation: explain(&loaded.model, request.features()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InferenceService>();
        assert_send_sync::<Prediction>();
    }

    #[test]
    fn unloaded_service_rejects_predictions() {
        let service = InferenceService::new();
        assert!(!service.is_ready());
        assert!(service.snapshot().is_none());
        let request = PredictionRequest::from_pairs(
            cardio_data::FIELDS.iter().map(|f| (f.name(), f.form_default)),
        )
        .unwrap();
        assert!(matches!(
            service.predict(&request),
            Err(ServiceError::NotReady)
        ));
    }
}
