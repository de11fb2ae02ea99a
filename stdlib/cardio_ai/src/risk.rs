use cardio_data::PatientFeatures;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskTier {
    Low,
    High,
}

impl RiskTier {
    pub fn from_label(label: u8) -> Self {
        if label == 1 {
            RiskTier::High
        } else {
            RiskTier::Low
        }
    }
}

/// Threshold checks on raw inputs, shown next to a positive prediction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    AgeAbove65,
    MaleGender,
    HighBloodPressure,
    HighCholesterol,
    ElevatedFastingBloodSugar,
}

impl RiskFactor {
    pub const ALL: [RiskFactor; 5] = [
        RiskFactor::AgeAbove65,
        RiskFactor::MaleGender,
        RiskFactor::HighBloodPressure,
        RiskFactor::HighCholesterol,
        RiskFactor::ElevatedFastingBloodSugar,
    ];

    pub fn description(self) -> &'static str {
        match self {
            RiskFactor::AgeAbove65 => "Age above 65",
            RiskFactor::MaleGender => "Male gender",
            RiskFactor::HighBloodPressure => "High blood pressure",
            RiskFactor::HighCholesterol => "High cholesterol",
            RiskFactor::ElevatedFastingBloodSugar => "Elevated fasting blood sugar",
        }
    }

    pub fn applies(self, f: &PatientFeatures) -> bool {
        match self {
            RiskFactor::AgeAbove65 => f.age > 65.0,
            RiskFactor::MaleGender => f.sex == 1.0,
            RiskFactor::HighBloodPressure => f.trestbps > 140.0,
            RiskFactor::HighCholesterol => f.chol > 240.0,
            RiskFactor::ElevatedFastingBloodSugar => f.fbs == 1.0,
        }
    }
}

impl fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// All factors whose threshold the inputs cross, in fixed order.
pub fn risk_factors(features: &PatientFeatures) -> Vec<RiskFactor> {
    RiskFactor::ALL
        .iter()
        .copied()
        .filter(|r| r.applies(features))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient(age: f64, sex: f64, trestbps: f64, chol: f64, fbs: f64) -> PatientFeatures {
        PatientFeatures::from_row([
            age, sex, 4.0, trestbps, chol, fbs, 0.0, 150.0, 0.0, 1.0, 2.0, 0.0, 3.0,
        ])
    }

    #[test]
    fn every_threshold_crossed() {
        let all = risk_factors(&patient(70.0, 1.0, 150.0, 250.0, 1.0));
        assert_eq!(all, RiskFactor::ALL.to_vec());
    }

    #[test]
    fn no_threshold_crossed() {
        assert!(risk_factors(&patient(40.0, 0.0, 110.0, 180.0, 0.0)).is_empty());
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert!(risk_factors(&patient(65.0, 0.0, 140.0, 240.0, 0.0)).is_empty());
    }

    #[test]
    fn tier_follows_label() {
        assert_eq!(RiskTier::from_label(1), RiskTier::High);
        assert_eq!(RiskTier::from_label(0), RiskTier::Low);
    }
}
