use serde::{Deserialize, Serialize};

use crate::schema::{Feature, FEATURE_COUNT};

/// A feature row in canonical order.
pub type FeatureRow = [f64; FEATURE_COUNT];

/// The 13 clinical measurements of one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientFeatures {
    pub age: f64,
    pub sex: f64,
    pub cp: f64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: f64,
    pub restecg: f64,
    pub thalach: f64,
    pub exang: f64,
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl PatientFeatures {
    pub fn from_row(row: FeatureRow) -> Self {
        let [age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang, oldpeak, slope, ca, thal] =
            row;
        Self {
            age,
            sex,
            cp,
            trestbps,
            chol,
            fbs,
            restecg,
            thalach,
            exang,
            oldpeak,
            slope,
            ca,
            thal,
        }
    }

    /// Values in [`Feature::ALL`] order.
    pub fn to_row(&self) -> FeatureRow {
        [
            self.age,
            self.sex,
            self.cp,
            self.trestbps,
            self.chol,
            self.fbs,
            self.restecg,
            self.thalach,
            self.exang,
            self.oldpeak,
            self.slope,
            self.ca,
            self.thal,
        ]
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.to_row()[feature.index()]
    }
}

/// Map a raw 0-4 outcome onto disease present (1) / absent (0).
pub fn binarize_target(raw: f64) -> u8 {
    if raw > 0.0 {
        1
    } else {
        0
    }
}

/// A complete training row with its binarized outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub features: FeatureRow,
    pub target: u8,
}

/// Complete, binarized rows ready for splitting and fitting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedDataset {
    records: Vec<LabeledRecord>,
}

impl CleanedDataset {
    pub fn from_records(records: Vec<LabeledRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LabeledRecord] {
        &self.records
    }

    pub fn features(&self) -> Vec<FeatureRow> {
        self.records.iter().map(|r| r.features).collect()
    }

    pub fn labels(&self) -> Vec<u8> {
        self.records.iter().map(|r| r.target).collect()
    }

    /// Rows at the given indices, in the order given.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self {
            records: indices.iter().map(|&i| self.records[i]).collect(),
        }
    }

    /// Counts of (no disease, disease) rows.
    pub fn class_counts(&self) -> (usize, usize) {
        let positive = self.records.iter().filter(|r| r.target == 1).count();
        (self.records.len() - positive, positive)
    }
}
