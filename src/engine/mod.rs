//! Rule-based diagnostic engine.
//!
//! The engine is the local fallback for the AI-backed assistant and the
//! algorithmic core of the crate. Both entry points are pure: they never
//! fail, perform no I/O and return the same output for the same input.
//!
//! # Pipeline
//!
//! ```text
//! PatientData ──► match & score ──► diagnoses ──► risk level ──► Analysis
//!                      │                                            ▲
//!                      └──────► question generation ────────────────┘
//!
//! Answers + Analysis ──► refine ──► Analysis
//! ```

mod assessment;
mod matching;
mod questions;
mod refinement;

pub use assessment::{
    condition_recommendations, general_recommendations, general_recommendations_for,
    initial_assessment, next_steps,
};
pub use matching::{
    modifier_bonus, score, urgency, MAX_PROBABILITY, MIN_PROBABILITY, URGENT_CONDITIONS,
};
pub use questions::{condition_questions, generic_questions, GENERAL_CATEGORY, MAX_QUESTIONS};
pub use refinement::{refine, AFFIRMATIVE_ADJUSTMENT, NEGATIVE_ADJUSTMENT};

use crate::knowledge;
use crate::model::{Analysis, Confidence, Diagnosis, PatientData, RiskLevel, Urgency};

/// Produce a preliminary analysis from the patient's symptom text.
///
/// Conditions whose keywords appear in the lowercased text are scored;
/// those above [`MIN_PROBABILITY`] become diagnoses and contribute their
/// follow-up questions. When nothing matches, the two generic questions
/// are asked instead. At most [`MAX_QUESTIONS`] questions are kept.
#[must_use]
pub fn analyze(patient: &PatientData) -> Analysis {
    let text = patient.symptoms.to_lowercase();
    let mut conditions = Vec::new();
    let mut questions = Vec::new();

    for (category, condition) in knowledge::conditions() {
        let matched = condition.matching_symptoms(&text);
        if matched.is_empty() {
            continue;
        }

        let probability = score(condition, matched.len(), &text);
        if probability <= MIN_PROBABILITY {
            continue;
        }

        conditions.push(Diagnosis {
            condition: condition.name.to_string(),
            condition_key: condition.key.clone(),
            probability,
            confidence: Confidence::from_probability(probability),
            symptoms: matched.into_iter().map(String::from).collect(),
            recommendations: condition_recommendations(condition.name),
            urgency: urgency(condition.name, probability),
            next_steps: next_steps(probability),
        });
        questions.extend(condition_questions(category, condition, probability));
    }

    let risk_level = risk_level(&conditions);

    let mut analysis = Analysis {
        initial_assessment: String::new(),
        possible_conditions: conditions,
        generated_questions: Vec::new(),
        risk_level,
        recommendations: general_recommendations(risk_level),
    };
    analysis.sort_conditions();

    if questions.is_empty() {
        questions = generic_questions();
    }
    questions.truncate(MAX_QUESTIONS);
    analysis.generated_questions = questions;

    analysis.initial_assessment =
        initial_assessment(&patient.symptoms, &analysis.possible_conditions);

    tracing::debug!(
        patient_id = %patient.id,
        conditions = analysis.possible_conditions.len(),
        questions = analysis.generated_questions.len(),
        risk_level = analysis.risk_level.as_str(),
        "Local analysis complete"
    );

    analysis
}

/// Overall risk implied by a set of diagnoses.
#[must_use]
pub fn risk_level(conditions: &[Diagnosis]) -> RiskLevel {
    if conditions.iter().any(|d| d.urgency == Urgency::Immediate) {
        RiskLevel::Critical
    } else if conditions.iter().any(|d| d.urgency == Urgency::Urgent) {
        RiskLevel::High
    } else if conditions.iter().any(|d| d.probability > 0.6) {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
