//! Plain-text presentation of predictions and of the input form.

use cardio_data::{Domain, FIELDS};
use std::fmt::Write;

use crate::decision_support::PREVENTION_TIPS;
use crate::service::Prediction;

pub const DISCLAIMER: &str = "Medical Disclaimer: This tool is for informational purposes only and should not replace professional medical advice.\nAlways consult with qualified healthcare providers for medical diagnosis and treatment.";

/// `0.734` -> `73.4%`.
pub fn percent(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

pub fn render(prediction: &Prediction) -> String {
    let mut out = String::new();
    if prediction.is_high_risk() {
        out.push_str("High Risk Detected\n");
        let _ = writeln!(out, "Risk Probability: {}", percent(prediction.probability));
        out.push_str("Recommendation: Please consult a cardiologist immediately for comprehensive evaluation.\n");
        out.push_str("Emergency: Call your local emergency services if experiencing chest pain, shortness of breath, or other severe symptoms.\n");
        if !prediction.risk_factors.is_empty() {
            let names: Vec<&str> = prediction
                .risk_factors
                .iter()
                .map(|r| r.description())
                .collect();
            out.push_str("\nRisk Factors Analysis\n");
            let _ = writeln!(out, "Identified risk factors: {}", names.join(", "));
        }
    } else {
        out.push_str("Low Risk Detected\n");
        let _ = writeln!(out, "Risk Probability: {}", percent(prediction.probability));
        out.push_str("Great news! Your current parameters indicate low risk for heart disease.\n");
        out.push_str("Continue maintaining a healthy lifestyle with regular exercise and balanced nutrition.\n");
        out.push_str("\nPrevention Tips\n");
        for tip in PREVENTION_TIPS {
            let _ = writeln!(out, "  - {tip}");
        }
    }
    out.push('\n');
    out.push_str(DISCLAIMER);
    out.push('\n');
    out
}

/// The input form: one entry per field in canonical order.
pub fn render_form() -> String {
    let mut out = String::new();
    for spec in FIELDS.iter() {
        let _ = write!(out, "{:<9} {}", spec.name(), spec.label);
        match spec.domain {
            Domain::Categorical(_) => {
                let _ = writeln!(out, " [{}]", spec.domain.describe());
            }
            _ => {
                let _ = writeln!(out, " ({})", spec.domain.describe());
            }
        }
        if let Some(help) = spec.help {
            let _ = writeln!(out, "          {help}");
        }
    }
    out
}
