//! Engine output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{Diagnosis, Question};

/// Overall risk of the patient.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Routine.
    #[default]
    Low,
    /// Needs a consultation.
    Medium,
    /// Needs urgent referral.
    High,
    /// Needs emergency care.
    Critical,
}

impl RiskLevel {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parse a wire name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Preliminary (or refined) diagnostic analysis for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Free-text initial assessment.
    pub initial_assessment: String,
    /// Diagnoses in descending probability order.
    #[serde(default)]
    pub possible_conditions: Vec<Diagnosis>,
    /// Follow-up questions, at most five when produced locally.
    #[serde(default)]
    pub generated_questions: Vec<Question>,
    /// Overall risk.
    #[serde(default)]
    pub risk_level: RiskLevel,
    /// General recommendations for the risk level.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl Analysis {
    /// The most probable diagnosis, if any.
    #[must_use]
    pub fn top_diagnosis(&self) -> Option<&Diagnosis> {
        self.possible_conditions.first()
    }

    /// Look up a generated question by id.
    #[must_use]
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.generated_questions.iter().find(|q| q.id == id)
    }

    /// Sort diagnoses by descending probability. Ties keep their order.
    pub fn sort_conditions(&mut self) {
        self.possible_conditions
            .sort_by(|a, b| b.probability.total_cmp(&a.probability));
    }
}
