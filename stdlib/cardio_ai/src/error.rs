use cardio_model::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the inference service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("model file not found: {}", .0.display())]
    ModelNotFound(PathBuf),
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("model was trained on features [{}], expected the canonical order", .0.join(", "))]
    SchemaMismatch(Vec<String>),
    #[error("no model is loaded")]
    NotReady,
    #[error("a model is already loaded; restart the service to pick up a new one")]
    AlreadyLoaded,
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::ArtifactNotFound(path) => ServiceError::ModelNotFound(path),
            other => ServiceError::InvalidArtifact(other.to_string()),
        }
    }
}
