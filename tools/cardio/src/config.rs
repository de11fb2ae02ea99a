use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use cardio_data::{DEFAULT_DATASET_PATH, DEFAULT_DATASET_URL};
use cardio_model::{TrainConfig, DEFAULT_MODEL_PATH};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "cardio.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    pub url: String,
    pub path: PathBuf,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATASET_URL.to_string(),
            path: PathBuf::from(DEFAULT_DATASET_PATH),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dataset: DatasetConfig,
    pub training: TrainConfig,
    pub model: ModelConfig,
}

impl Config {
    /// Read `path`, or `cardio.toml` when none is given. Only the implicit
    /// file may be absent, in which case defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILE), false),
        };
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound && !explicit => {
                log::debug!("no {} found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let config: Self =
            toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.training
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_means_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model.path, PathBuf::from("heart_disease_model.json"));
        assert_eq!(config.dataset.path, PathBuf::from("heart.csv"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str("[training]\nseed = 7\n").unwrap();
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.test_fraction, 0.2);
        assert_eq!(config.dataset, DatasetConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("[training]\nrandom_state = 1\n").is_err());
        assert!(toml::from_str::<Config>("[server]\nport = 1\n").is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = Config::default().to_toml().unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, Config::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cardio.toml");
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn invalid_training_values_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cardio.toml");
        fs::write(&path, "[training]\nmax_iter = 10\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Invalid(_))
        ));
    }
}
