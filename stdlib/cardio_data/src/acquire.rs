//! One-shot download of the raw dataset file.

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use std::fs;
use std::path::Path;

use crate::error::FetchError;

/// Mirror of the UCI `processed.cleveland.data` file.
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/reinaldoq/processing-heart-disease-dataset/master/processed.cleveland.data";

/// Where the raw file is written when no path is configured.
pub const DEFAULT_DATASET_PATH: &str = "heart.csv";

/// Some hosts reject the default client identifier.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0";

#[derive(Debug, Clone)]
pub struct Acquirer {
    client: Client,
}

impl Acquirer {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder().user_agent(BROWSER_USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxy settings, loopback tests).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET `url` and return the body when the server answers 200.
    pub fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.bytes()?;
        Ok(body.to_vec())
    }

    /// Fetch `url` and write the body verbatim to `path`, replacing any existing file.
    pub fn download(&self, url: &str, path: impl AsRef<Path>) -> Result<usize, FetchError> {
        let path = path.as_ref();
        let body = self.fetch(url)?;
        fs::write(path, &body).map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("wrote {} bytes to {}", body.len(), path.display());
        Ok(body.len())
    }
}

pub fn fetch(url: &str) -> Result<Vec<u8>, FetchError> {
    Acquirer::new()?.fetch(url)
}

pub fn download(url: &str, path: impl AsRef<Path>) -> Result<usize, FetchError> {
    Acquirer::new()?.download(url, path)
}
