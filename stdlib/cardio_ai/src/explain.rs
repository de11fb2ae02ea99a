use cardio_data::{Feature, PatientFeatures};
use cardio_model::LogisticRegression;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: Feature,
    pub value: f64,
    pub coefficient: f64,
    /// `coefficient * value`, on the log-odds scale.
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub intercept: f64,
    /// Largest absolute contribution first.
    pub contributions: Vec<FeatureContribution>,
}

impl Explanation {
    pub fn log_odds(&self) -> f64 {
        self.intercept + self.contributions.iter().map(|c| c.contribution).sum::<f64>()
    }

    pub fn top(&self, n: usize) -> &[FeatureContribution] {
        &self.contributions[..n.min(self.contributions.len())]
    }
}

pub fn explain(model: &LogisticRegression, features: &PatientFeatures) -> Explanation {
    let mut contributions: Vec<FeatureContribution> = Feature::ALL
        .iter()
        .zip(model.coefficients.iter())
        .map(|(&feature, &coefficient)| {
            let value = features.get(feature);
            FeatureContribution {
                feature,
                value,
                coefficient,
                contribution: coefficient * value,
            }
        })
        .collect();
    // stable: equal magnitudes keep canonical order
    contributions.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));

    Explanation {
        intercept: model.intercept,
        contributions,
    }
}
