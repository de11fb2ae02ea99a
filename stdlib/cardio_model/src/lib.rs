//! Heart-disease classifiers.
//!
//! `trainer` fits the production logistic model and `artifact` persists it.
//! `evaluate` is a diagnostic comparison against a decision tree; it never
//! writes an artifact.

pub mod artifact;
pub mod error;
pub mod evaluate;
pub mod logistic;
pub mod metrics;
pub mod trainer;
pub mod tree;

pub use artifact::{
    ModelArtifact, TrainingMetadata, ARTIFACT_FORMAT, ARTIFACT_VERSION, DEFAULT_MODEL_PATH,
};
pub use error::ModelError;
pub use evaluate::{evaluate, ClassifierScore, EvaluationReport};
pub use logistic::{sigmoid, FitSummary, LogisticRegression, LogisticRegressionParams};
pub use metrics::{roc_auc, ConfusionMatrix};
pub use trainer::{train, train_and_save, TrainConfig, TrainedModel};
pub use tree::{DecisionTree, DecisionTreeParams, Node};

/// A binary classifier over canonical feature rows.
pub trait Classifier {
    fn name(&self) -> &str;

    /// Probability of class 1.
    fn predict_proba(&self, row: &[f64]) -> f64;

    fn predict(&self, row: &[f64]) -> u8 {
        u8::from(self.predict_proba(row) >= 0.5)
    }
}
