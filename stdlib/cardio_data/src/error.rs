use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, cleaning or partitioning the dataset.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {message}")]
    Parse { line: u64, message: String },
    #[error("invalid split: {0}")]
    InvalidSplit(String),
}

/// Errors raised while downloading the raw dataset.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("server responded with status code {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
