//! Scored conditions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Probability above which confidence is high.
const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Probability above which confidence is medium.
const MEDIUM_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Confidence in a diagnosis, a pure function of its probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Probability above 0.7.
    High,
    /// Probability above 0.5.
    Medium,
    /// Anything else.
    Low,
}

impl Confidence {
    /// Classify a probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability > HIGH_CONFIDENCE_THRESHOLD {
            Self::High
        } else if probability > MEDIUM_CONFIDENCE_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parse a wire name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// How quickly the patient needs care.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Routine follow-up.
    Low,
    /// Consultation within days.
    Moderate,
    /// Urgent referral.
    Urgent,
    /// Emergency care now.
    Immediate,
}

impl Urgency {
    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::Urgent => "urgent",
            Self::Immediate => "immediate",
        }
    }

    /// Parse a wire name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "urgent" => Some(Self::Urgent),
            "immediate" => Some(Self::Immediate),
            _ => None,
        }
    }
}

/// Derive the stable key of a condition name: lowercase, with each run of
/// whitespace replaced by a single `_`.
///
/// ```
/// use triage_assist::model::condition_key;
///
/// assert_eq!(condition_key("Angina de Peito"), "angina_de_peito");
/// ```
#[must_use]
pub fn condition_key(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// A condition scored for one patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    /// Condition name.
    pub condition: String,
    /// Derived condition key. Empty when the diagnosis came from outside the
    /// knowledge base; see [`Diagnosis::key`].
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schemars(skip)]
    pub condition_key: String,
    /// Probability in [0, 1].
    pub probability: f64,
    /// Confidence derived from the probability.
    pub confidence: Confidence,
    /// Matched symptom keywords.
    #[serde(default)]
    pub symptoms: Vec<String>,
    /// Condition-specific recommendations.
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Urgency class.
    pub urgency: Urgency,
    /// Next steps for the health worker.
    #[serde(default)]
    pub next_steps: Vec<String>,
}

impl Diagnosis {
    /// Condition key, derived from the name when it was not stored.
    #[must_use]
    pub fn key(&self) -> String {
        if self.condition_key.is_empty() {
            condition_key(&self.condition)
        } else {
            self.condition_key.clone()
        }
    }

    /// Set the probability, clamped to [0, 1], and recompute confidence.
    pub fn set_probability(&mut self, probability: f64) {
        self.probability = probability.clamp(0.0, 1.0);
        self.confidence = Confidence::from_probability(self.probability);
    }

    /// Probability as a whole percentage, rounded half away from zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn percentage(&self) -> i64 {
        (self.probability * 100.0).round() as i64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn diagnosis(probability: f64) -> Diagnosis {
        Diagnosis {
            condition: "Asma".into(),
            condition_key: String::new(),
            probability,
            confidence: Confidence::from_probability(probability),
            symptoms: vec!["falta de ar".into()],
            recommendations: vec![],
            urgency: Urgency::Low,
            next_steps: vec![],
        }
    }

    #[test_case(0.95, Confidence::High ; "well above high")]
    #[test_case(0.71, Confidence::High ; "just above high")]
    #[test_case(0.7, Confidence::Medium ; "high boundary is medium")]
    #[test_case(0.51, Confidence::Medium ; "just above medium")]
    #[test_case(0.5, Confidence::Low ; "medium boundary is low")]
    #[test_case(0.0, Confidence::Low ; "zero")]
    fn test_confidence_thresholds(probability: f64, expected: Confidence) {
        assert_eq!(Confidence::from_probability(probability), expected);
    }

    #[test_case("Angina de Peito", "angina_de_peito")]
    #[test_case("Infarto Agudo do Miocárdio", "infarto_agudo_do_miocárdio")]
    #[test_case("Ataque  Isquêmico\tTransitório (AIT)", "ataque_isquêmico_transitório_(ait)")]
    #[test_case("Asma", "asma")]
    fn test_condition_key(name: &str, expected: &str) {
        assert_eq!(condition_key(name), expected);
    }

    #[test]
    fn test_key_falls_back_to_name() {
        let mut d = diagnosis(0.5);
        assert_eq!(d.key(), "asma");
        d.condition_key = "stored".into();
        assert_eq!(d.key(), "stored");
    }

    #[test]
    fn test_set_probability_clamps_and_reclassifies() {
        let mut d = diagnosis(0.65);
        d.set_probability(0.75);
        assert_eq!(d.confidence, Confidence::High);
        d.set_probability(1.4);
        assert_eq!(d.probability, 1.0);
        d.set_probability(-0.2);
        assert_eq!(d.probability, 0.0);
        assert_eq!(d.confidence, Confidence::Low);
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(diagnosis(0.533_333).percentage(), 53);
        assert_eq!(diagnosis(0.7).percentage(), 70);
        assert_eq!(diagnosis(0.956).percentage(), 96);
    }

    #[test]
    fn test_serialization_hides_empty_key() {
        let json = serde_json::to_value(diagnosis(0.6)).unwrap();
        assert!(json.get("conditionKey").is_none());
        assert_eq!(json["confidence"], "medium");
        assert_eq!(json["urgency"], "low");
        assert!(json.get("nextSteps").is_some());
    }

    #[test]
    fn test_urgency_parse() {
        assert_eq!(Urgency::parse("IMMEDIATE"), Some(Urgency::Immediate));
        assert!(Urgency::parse("soon").is_none());
        assert!(Urgency::Immediate > Urgency::Urgent);
    }
}
