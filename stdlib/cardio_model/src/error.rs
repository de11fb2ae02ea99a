use cardio_data::DataError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fitting, persisting or evaluating models
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Data(#[from] DataError),
    #[error("training set is empty")]
    EmptyTrainingSet,
    #[error("training set only contains class {0}; both outcomes are required")]
    SingleClass(u8),
    #[error("expected {expected} values per row, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Hessian is not positive definite")]
    Singular,
    #[error("model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),
    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
