//! Diagnostic comparison of classifiers on the held-out partition.
//!
//! Uses the same seeded split as the trainer so the logistic score here
//! matches the accuracy recorded in the artifact.

use cardio_data::{train_test_split, CleanedDataset};
use log::info;
use serde::Serialize;
use std::fmt;

use crate::error::ModelError;
use crate::logistic::LogisticRegression;
use crate::metrics::{roc_auc, ConfusionMatrix};
use crate::trainer::TrainConfig;
use crate::tree::{DecisionTree, DecisionTreeParams};
use crate::Classifier;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierScore {
    pub name: String,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub roc_auc: f64,
    pub confusion: ConfusionMatrix,
}

impl ClassifierScore {
    pub fn score(classifier: &dyn Classifier, test: &CleanedDataset) -> Self {
        let probabilities: Vec<f64> = test
            .records()
            .iter()
            .map(|r| classifier.predict_proba(&r.features))
            .collect();
        let labels = test.labels();
        let confusion = ConfusionMatrix::compute(&probabilities, &labels, 0.5);
        Self {
            name: classifier.name().to_string(),
            accuracy: confusion.accuracy(),
            precision: confusion.precision(),
            recall: confusion.recall(),
            f1: confusion.f1(),
            roc_auc: roc_auc(&probabilities, &labels),
            confusion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub seed: u64,
    pub train_rows: usize,
    pub test_rows: usize,
    pub scores: Vec<ClassifierScore>,
}

impl EvaluationReport {
    pub fn get(&self, name: &str) -> Option<&ClassifierScore> {
        self.scores.iter().find(|s| s.name == name)
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "train rows: {}, test rows: {}, seed: {}",
            self.train_rows, self.test_rows, self.seed
        )?;
        for s in &self.scores {
            writeln!(f, "{} Accuracy: {:.4}", s.name, s.accuracy)?;
            writeln!(
                f,
                "  precision {:.4}  recall {:.4}  f1 {:.4}  roc-auc {:.4}",
                s.precision, s.recall, s.f1, s.roc_auc
            )?;
            let m = &s.confusion;
            writeln!(
                f,
                "  confusion [[{} {}] [{} {}]]",
                m.true_negative, m.false_positive, m.false_negative, m.true_positive
            )?;
        }
        Ok(())
    }
}

/// Fit logistic regression and a decision tree on the training partition
/// and score both on the test partition.
pub fn evaluate(
    dataset: &CleanedDataset,
    config: &TrainConfig,
) -> Result<EvaluationReport, ModelError> {
    config.validate()?;
    let split = train_test_split(dataset, config.test_fraction, config.seed)?;
    let x = split.train.features();
    let y = split.train.labels();

    let (logistic, _) = LogisticRegression::fit(&x, &y, &config.logistic_params())?;
    let tree = DecisionTree::fit(&x, &y, &DecisionTreeParams::default())?;

    let classifiers: [&dyn Classifier; 2] = [&logistic, &tree];
    let scores: Vec<ClassifierScore> = classifiers
        .iter()
        .map(|c| ClassifierScore::score(*c, &split.test))
        .collect();
    for s in &scores {
        info!("{} accuracy {:.4}", s.name, s.accuracy);
    }

    Ok(EvaluationReport {
        seed: config.seed,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
        scores,
    })
}
