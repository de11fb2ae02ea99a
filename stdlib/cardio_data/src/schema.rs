//! Canonical feature order and the form/validation field table.
//!
//! Everything that builds a feature vector (the trainer, the persisted
//! artifact, the inference service) goes through [`Feature::ALL`], so the
//! coefficient vector can never drift out of line with request handling.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of model features.
pub const FEATURE_COUNT: usize = 13;

/// Number of columns in a raw dataset row (features + target).
pub const COLUMN_COUNT: usize = FEATURE_COUNT + 1;

/// Name of the raw outcome column.
pub const TARGET_NAME: &str = "target";

/// Literal used by the raw dataset for an unknown value.
pub const MISSING_MARKER: &str = "?";

/// Feature names in the order the model coefficients are bound to.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal",
];

/// Raw column names: the features followed by the target.
pub const COLUMN_NAMES: [&str; COLUMN_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg", "thalach", "exang", "oldpeak",
    "slope", "ca", "thal", TARGET_NAME,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Age,
    Sex,
    Cp,
    Trestbps,
    Chol,
    Fbs,
    Restecg,
    Thalach,
    Exang,
    Oldpeak,
    Slope,
    Ca,
    Thal,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Age,
        Feature::Sex,
        Feature::Cp,
        Feature::Trestbps,
        Feature::Chol,
        Feature::Fbs,
        Feature::Restecg,
        Feature::Thalach,
        Feature::Exang,
        Feature::Oldpeak,
        Feature::Slope,
        Feature::Ca,
        Feature::Thal,
    ];

    /// Position of this feature in the model's coefficient vector.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        FEATURE_NAMES[self as usize]
    }

    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Form/validation entry for this feature.
    pub fn spec(self) -> &'static FieldSpec {
        &FIELDS[self.index()]
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One admissible value of a categorical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub value: i64,
    pub label: &'static str,
}

const fn code(value: i64, label: &'static str) -> Code {
    Code { value, label }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    /// Whole numbers within an inclusive range.
    Integer { min: i64, max: i64 },
    /// Real numbers within an inclusive range.
    Float { min: f64, max: f64 },
    /// One of an enumerated code set.
    Categorical(&'static [Code]),
}

impl Domain {
    /// Check a value against the domain, returning a human readable reason on failure.
    pub fn check(&self, value: f64) -> Result<(), String> {
        if !value.is_finite() {
            return Err(format!("{value} is not a finite number"));
        }
        match *self {
            Domain::Integer { min, max } => {
                if value.fract() != 0.0 {
                    return Err(format!("{value} is not a whole number"));
                }
                if value < min as f64 || value > max as f64 {
                    return Err(format!("{value} is outside {min}..={max}"));
                }
            }
            Domain::Float { min, max } => {
                if value < min || value > max {
                    return Err(format!("{value} is outside {min:.1}..={max:.1}"));
                }
            }
            Domain::Categorical(codes) => {
                if !codes.iter().any(|c| c.value as f64 == value) {
                    let allowed: Vec<String> = codes.iter().map(|c| c.value.to_string()).collect();
                    return Err(format!("{value} is not one of {{{}}}", allowed.join(", ")));
                }
            }
        }
        Ok(())
    }

    /// Short textual description used by the form listing.
    pub fn describe(&self) -> String {
        match *self {
            Domain::Integer { min, max } => format!("integer {min}-{max}"),
            Domain::Float { min, max } => format!("number {min:.1}-{max:.1}"),
            Domain::Categorical(codes) => codes
                .iter()
                .map(|c| format!("{}={}", c.value, c.label))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Display and validation metadata for one input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub feature: Feature,
    pub label: &'static str,
    pub help: Option<&'static str>,
    pub domain: Domain,
    /// Value the form pre-fills; never used to fill in a missing request field.
    pub form_default: f64,
}

impl FieldSpec {
    pub fn name(&self) -> &'static str {
        self.feature.name()
    }

    pub fn validate(&self, value: f64) -> Result<f64, String> {
        self.domain
            .check(value)
            .map(|()| value)
            .map_err(|reason| format!("{}: {reason}", self.name()))
    }
}

const SEX_CODES: &[Code] = &[code(0, "Female"), code(1, "Male")];
const CP_CODES: &[Code] = &[
    code(1, "typical angina"),
    code(2, "atypical angina"),
    code(3, "non-anginal pain"),
    code(4, "asymptomatic"),
];
const FBS_CODES: &[Code] = &[code(0, "False"), code(1, "True")];
const RESTECG_CODES: &[Code] = &[
    code(0, "normal"),
    code(1, "ST-T wave abnormality"),
    code(2, "left ventricular hypertrophy"),
];
const EXANG_CODES: &[Code] = &[code(0, "No"), code(1, "Yes")];
const SLOPE_CODES: &[Code] = &[
    code(1, "upsloping"),
    code(2, "flat"),
    code(3, "downsloping"),
];
const CA_CODES: &[Code] = &[code(0, "0"), code(1, "1"), code(2, "2"), code(3, "3")];
const THAL_CODES: &[Code] = &[
    code(3, "normal"),
    code(6, "fixed defect"),
    code(7, "reversable defect"),
];

/// Field table in canonical feature order.
pub static FIELDS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec {
        feature: Feature::Age,
        label: "Age",
        help: None,
        domain: Domain::Integer { min: 1, max: 120 },
        form_default: 50.0,
    },
    FieldSpec {
        feature: Feature::Sex,
        label: "Sex",
        help: None,
        domain: Domain::Categorical(SEX_CODES),
        form_default: 0.0,
    },
    FieldSpec {
        feature: Feature::Cp,
        label: "Chest Pain Type",
        help: Some("1: typical angina, 2: atypical angina, 3: non-anginal pain, 4: asymptomatic"),
        domain: Domain::Categorical(CP_CODES),
        form_default: 1.0,
    },
    FieldSpec {
        feature: Feature::Trestbps,
        label: "Resting Blood Pressure (mm Hg)",
        help: None,
        domain: Domain::Integer { min: 50, max: 250 },
        form_default: 120.0,
    },
    FieldSpec {
        feature: Feature::Chol,
        label: "Cholesterol (mg/dl)",
        help: None,
        domain: Domain::Integer { min: 100, max: 600 },
        form_default: 200.0,
    },
    FieldSpec {
        feature: Feature::Fbs,
        label: "Fasting Blood Sugar > 120 mg/dl",
        help: None,
        domain: Domain::Categorical(FBS_CODES),
        form_default: 0.0,
    },
    FieldSpec {
        feature: Feature::Restecg,
        label: "Resting ECG Results",
        help: Some("0: normal, 1: ST-T wave abnormality, 2: left ventricular hypertrophy"),
        domain: Domain::Categorical(RESTECG_CODES),
        form_default: 0.0,
    },
    FieldSpec {
        feature: Feature::Thalach,
        label: "Max Heart Rate Achieved",
        help: None,
        domain: Domain::Integer { min: 50, max: 250 },
        form_default: 150.0,
    },
    FieldSpec {
        feature: Feature::Exang,
        label: "Exercise Induced Angina",
        help: None,
        domain: Domain::Categorical(EXANG_CODES),
        form_default: 0.0,
    },
    FieldSpec {
        feature: Feature::Oldpeak,
        label: "ST Depression Induced by Exercise",
        help: None,
        domain: Domain::Float {
            min: 0.0,
            max: 10.0,
        },
        form_default: 1.0,
    },
    FieldSpec {
        feature: Feature::Slope,
        label: "Slope of Peak Exercise ST Segment",
        help: Some("1: upsloping, 2: flat, 3: downsloping"),
        domain: Domain::Categorical(SLOPE_CODES),
        form_default: 1.0,
    },
    FieldSpec {
        feature: Feature::Ca,
        label: "Number of Major Vessels (0-3)",
        help: None,
        domain: Domain::Categorical(CA_CODES),
        form_default: 0.0,
    },
    FieldSpec {
        feature: Feature::Thal,
        label: "Thalassemia",
        help: Some("3: normal, 6: fixed defect, 7: reversable defect"),
        domain: Domain::Categorical(THAL_CODES),
        form_default: 3.0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_table_follows_feature_order() {
        for (i, spec) in FIELDS.iter().enumerate() {
            assert_eq!(spec.feature.index(), i);
            assert_eq!(spec.name(), FEATURE_NAMES[i]);
            assert_eq!(COLUMN_NAMES[i], FEATURE_NAMES[i]);
        }
        assert_eq!(COLUMN_NAMES[FEATURE_COUNT], TARGET_NAME);
    }

    #[test]
    fn names_resolve_back_to_features() {
        for f in Feature::ALL {
            assert_eq!(Feature::from_name(f.name()), Some(f));
        }
        assert_eq!(Feature::from_name("target"), None);
        assert_eq!(Feature::from_name("Age"), None);
    }

    #[test]
    fn form_defaults_are_in_domain() {
        for spec in &FIELDS {
            assert!(spec.validate(spec.form_default).is_ok(), "{}", spec.name());
        }
    }

    #[test]
    fn domain_checks() {
        let age = Feature::Age.spec();
        assert!(age.validate(1.0).is_ok());
        assert!(age.validate(120.0).is_ok());
        assert!(age.validate(0.0).is_err());
        assert!(age.validate(121.0).is_err());
        assert!(age.validate(50.5).is_err());
        assert!(age.validate(f64::NAN).is_err());

        let oldpeak = Feature::Oldpeak.spec();
        assert!(oldpeak.validate(2.3).is_ok());
        assert!(oldpeak.validate(10.0).is_ok());
        assert!(oldpeak.validate(-0.1).is_err());

        let thal = Feature::Thal.spec();
        assert!(thal.validate(7.0).is_ok());
        assert!(thal.validate(5.0).is_err());
        let err = thal.validate(4.0).unwrap_err();
        assert!(err.starts_with("thal:"), "{err}");
    }
}
