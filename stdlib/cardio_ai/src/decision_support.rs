use serde::{Deserialize, Serialize};

use crate::service::Prediction;

pub const PREVENTION_TIPS: [&str; 6] = [
    "Exercise regularly (30 minutes, 5 days a week)",
    "Eat a balanced diet rich in fruits and vegetables",
    "Avoid smoking and limit alcohol consumption",
    "Get 7-8 hours of quality sleep",
    "Manage stress through meditation or yoga",
    "Schedule regular health check-ups",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub action: String,
    pub rationale: String,
    pub priority: Priority,
}

fn recommend(action: &str, rationale: impl Into<String>, priority: Priority) -> Recommendation {
    Recommendation {
        action: action.to_string(),
        rationale: rationale.into(),
        priority,
    }
}

pub fn suggest_next_steps(prediction: &Prediction) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if prediction.is_high_risk() {
        out.push(recommend(
            "consult_cardiologist",
            "Please consult a cardiologist immediately for comprehensive evaluation.",
            Priority::High,
        ));
        out.push(recommend(
            "emergency_services",
            "Call your local emergency services if experiencing chest pain, shortness of breath, or other severe symptoms.",
            Priority::High,
        ));
        if !prediction.risk_factors.is_empty() {
            let names: Vec<&str> = prediction
                .risk_factors
                .iter()
                .map(|r| r.description())
                .collect();
            out.push(recommend(
                "review_risk_factors",
                format!("Identified risk factors: {}", names.join(", ")),
                Priority::Medium,
            ));
        }
    } else {
        out.push(recommend(
            "maintain_healthy_lifestyle",
            "Continue maintaining a healthy lifestyle with regular exercise and balanced nutrition.",
            Priority::Low,
        ));
        for tip in PREVENTION_TIPS {
            out.push(recommend("prevention_tip", tip, Priority::Low));
        }
    }

    out
}
