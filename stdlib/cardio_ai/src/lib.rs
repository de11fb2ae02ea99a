//! Heart-disease inference.
//!
//! An [`InferenceService`] loads one trained artifact and turns validated
//! [`PredictionRequest`]s into [`Prediction`]s. `render` and
//! `decision_support` present the result; they never influence it.

pub mod decision_support;
pub mod error;
pub mod explain;
pub mod render;
pub mod request;
pub mod risk;
pub mod service;

pub use decision_support::{suggest_next_steps, Priority, Recommendation, PREVENTION_TIPS};
pub use error::ServiceError;
pub use explain::{explain, Explanation, FeatureContribution};
pub use render::{render, render_form, DISCLAIMER};
pub use request::PredictionRequest;
pub use risk::{risk_factors, RiskFactor, RiskTier};
pub use service::{InferenceService, LoadedModel, Prediction, DECISION_THRESHOLD};
