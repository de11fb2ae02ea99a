//! Named-field prediction requests, validated against the shared field table.

use cardio_data::{Feature, PatientFeatures, FEATURE_COUNT};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::ServiceError;

fn malformed(message: impl Into<String>) -> ServiceError {
    ServiceError::MalformedInput(message.into())
}

/// A complete, validated set of the 13 clinical inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PredictionRequest {
    features: PatientFeatures,
}

impl PredictionRequest {
    /// Build from `(name, value)` pairs in any order. Every field must appear
    /// exactly once and satisfy its domain.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut slots: [Option<f64>; FEATURE_COUNT] = [None; FEATURE_COUNT];
        for (name, value) in pairs {
            let name = name.as_ref();
            let feature = Feature::from_name(name)
                .ok_or_else(|| malformed(format!("unknown field '{name}'")))?;
            let slot = &mut slots[feature.index()];
            if slot.is_some() {
                return Err(malformed(format!("field '{name}' given more than once")));
            }
            *slot = Some(feature.spec().validate(value).map_err(ServiceError::MalformedInput)?);
        }

        let mut row = [0.0; FEATURE_COUNT];
        let mut missing = Vec::new();
        for feature in Feature::ALL {
            match slots[feature.index()] {
                Some(v) => row[feature.index()] = v,
                None => missing.push(feature.name()),
            }
        }
        if !missing.is_empty() {
            return Err(malformed(format!("missing field(s): {}", missing.join(", "))));
        }
        Ok(Self {
            features: PatientFeatures::from_row(row),
        })
    }

    /// Build from a JSON object whose values are all numbers.
    pub fn from_json(value: &JsonValue) -> Result<Self, ServiceError> {
        let object = value
            .as_object()
            .ok_or_else(|| malformed("request must be a JSON object"))?;
        let mut pairs = Vec::with_capacity(object.len());
        for (name, v) in object {
            let x = v
                .as_f64()
                .ok_or_else(|| malformed(format!("{name}: expected a number, got {v}")))?;
            pairs.push((name.as_str(), x));
        }
        Self::from_pairs(pairs)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ServiceError> {
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| malformed(format!("request is not valid JSON: {e}")))?;
        Self::from_json(&value)
    }

    /// Build from `name=value` strings, as given on a command line.
    pub fn from_assignments<I, S>(items: I) -> Result<Self, ServiceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pairs = Vec::new();
        for item in items {
            let item = item.as_ref();
            let (name, raw) = item
                .split_once('=')
                .ok_or_else(|| malformed(format!("expected name=value, got '{item}'")))?;
            let name = name.trim();
            let value: f64 = raw
                .trim()
                .parse()
                .map_err(|_| malformed(format!("{name}: '{}' is not a number", raw.trim())))?;
            pairs.push((name.to_string(), value));
        }
        Self::from_pairs(pairs)
    }

    /// Validate an already assembled feature set.
    pub fn from_features(features: PatientFeatures) -> Result<Self, ServiceError> {
        Self::from_pairs(
            Feature::ALL
                .iter()
                .map(|f| (f.name(), features.get(*f))),
        )
    }

    pub fn features(&self) -> &PatientFeatures {
        &self.features
    }

    /// Values in canonical model order.
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        self.features.to_row()
    }
}
