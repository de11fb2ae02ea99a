use cardio_data::{train_test_split, CleanedDataset, Split, DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::artifact::{ModelArtifact, TrainingMetadata};
use crate::error::ModelError;
use crate::logistic::{FitSummary, LogisticRegression, LogisticRegressionParams};
use crate::metrics;

/// Settings shared by the trainer and the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainConfig {
    pub seed: u64,
    pub test_fraction: f64,
    pub max_iter: usize,
    /// Inverse L2 regularisation strength.
    pub c: f64,
    pub tolerance: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            test_fraction: DEFAULT_TEST_FRACTION,
            max_iter: 1000,
            c: 1.0,
            tolerance: 1e-4,
        }
    }
}

impl TrainConfig {
    /// Lower bound on the iteration cap; the fit must be allowed to converge.
    pub const MIN_ITERATIONS: usize = 1000;

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.max_iter < Self::MIN_ITERATIONS {
            return Err(ModelError::InvalidConfig(format!(
                "max_iter must be at least {}, got {}",
                Self::MIN_ITERATIONS,
                self.max_iter
            )));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(ModelError::InvalidConfig(format!(
                "test_fraction must be strictly between 0 and 1, got {}",
                self.test_fraction
            )));
        }
        Ok(())
    }

    pub fn logistic_params(&self) -> LogisticRegressionParams {
        LogisticRegressionParams {
            c: self.c,
            max_iter: self.max_iter,
            tolerance: self.tolerance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub model: LogisticRegression,
    pub summary: FitSummary,
    pub split: Split,
    pub test_accuracy: f64,
    pub config: TrainConfig,
}

impl TrainedModel {
    pub fn artifact(&self) -> ModelArtifact {
        ModelArtifact::new(
            &self.model,
            TrainingMetadata {
                seed: self.config.seed,
                test_fraction: self.config.test_fraction,
                c: self.config.c,
                train_rows: self.split.train.len(),
                test_rows: self.split.test.len(),
                iterations: self.summary.iterations,
                converged: self.summary.converged,
                test_accuracy: self.test_accuracy,
            },
        )
    }
}

/// Split with the configured seed and fit on the training partition only.
pub fn train(dataset: &CleanedDataset, config: &TrainConfig) -> Result<TrainedModel, ModelError> {
    config.validate()?;
    let split = train_test_split(dataset, config.test_fraction, config.seed)?;
    let (model, summary) = LogisticRegression::fit(
        &split.train.features(),
        &split.train.labels(),
        &config.logistic_params(),
    )?;

    let probabilities: Vec<f64> = split
        .test
        .records()
        .iter()
        .map(|r| model.predict_proba(&r.features))
        .collect();
    let test_accuracy = metrics::accuracy(&probabilities, &split.test.labels(), 0.5);
    info!(
        "fitted logistic regression on {} rows in {} iterations (converged: {}), test accuracy {:.4}",
        split.train.len(),
        summary.iterations,
        summary.converged,
        test_accuracy
    );

    Ok(TrainedModel {
        model,
        summary,
        split,
        test_accuracy,
        config: config.clone(),
    })
}

/// [`train`] and persist the artifact to `path`, overwriting it.
pub fn train_and_save(
    dataset: &CleanedDataset,
    config: &TrainConfig,
    path: impl AsRef<Path>,
) -> Result<TrainedModel, ModelError> {
    let trained = train(dataset, config)?;
    trained.artifact().save(path)?;
    Ok(trained)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = TrainConfig::default();
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.test_fraction, 0.2);
        assert_eq!(cfg.max_iter, 1000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn low_iteration_cap_is_rejected() {
        let cfg = TrainConfig {
            max_iter: 100,
            ..TrainConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ModelError::InvalidConfig(_))));
    }

    #[test]
    fn config_reads_partial_toml_like_json() {
        let cfg: TrainConfig = serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.max_iter, 1000);
        assert!(serde_json::from_str::<TrainConfig>(r#"{"sead": 7}"#).is_err());
    }
}
