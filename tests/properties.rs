//! Property tests for the local diagnostic engine.
//!
//! Symptom texts are assembled from knowledge-base keywords, intensity
//! modifiers and filler words so that every branch of the scoring rules
//! gets exercised.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::collections::HashSet;

use proptest::prelude::*;

use triage_assist::engine::{self, MAX_PROBABILITY, MAX_QUESTIONS, MIN_PROBABILITY};
use triage_assist::model::{
    Answer, AnswerValue, Confidence, Gender, PatientData, RiskLevel, Urgency,
};

const VOCABULARY: &[&str] = &[
    "aperto no peito",
    "tontura",
    "falta de ar",
    "sudorese",
    "dor de cabeça",
    "perda de consciência",
    "chiado no peito",
    "febre",
    "tosse",
    "cansaço",
    "forte",
    "intenso",
    "constante",
    "piora",
    "à noite",
];

fn symptom_text() -> impl Strategy<Value = String> {
    prop::sample::subsequence(VOCABULARY, 0..=VOCABULARY.len())
        .prop_shuffle()
        .prop_map(|words| words.join(" e "))
}

fn answer_value() -> impl Strategy<Value = AnswerValue> {
    prop_oneof![
        any::<bool>().prop_map(AnswerValue::Bool),
        Just(AnswerValue::Text("Sim".to_string())),
        Just(AnswerValue::Text("Não".to_string())),
        Just(AnswerValue::Text("talvez".to_string())),
        (0.0..10.0f64).prop_map(AnswerValue::Number),
        Just(AnswerValue::Empty),
    ]
}

fn patient(symptoms: &str) -> PatientData {
    PatientData::new("Paciente", 45, Gender::Other, symptoms)
}

proptest! {
    #[test]
    fn analysis_probabilities_stay_in_range(symptoms in symptom_text()) {
        let analysis = engine::analyze(&patient(&symptoms));

        for diagnosis in &analysis.possible_conditions {
            prop_assert!(diagnosis.probability > MIN_PROBABILITY);
            prop_assert!(diagnosis.probability <= MAX_PROBABILITY);
            prop_assert_eq!(
                diagnosis.confidence,
                Confidence::from_probability(diagnosis.probability)
            );
        }
    }

    #[test]
    fn analysis_conditions_are_sorted(symptoms in symptom_text()) {
        let analysis = engine::analyze(&patient(&symptoms));

        for pair in analysis.possible_conditions.windows(2) {
            prop_assert!(pair[0].probability >= pair[1].probability);
        }
    }

    #[test]
    fn analysis_question_bounds(symptoms in symptom_text()) {
        let analysis = engine::analyze(&patient(&symptoms));

        prop_assert!(!analysis.generated_questions.is_empty());
        prop_assert!(analysis.generated_questions.len() <= MAX_QUESTIONS);
        let ids: HashSet<_> = analysis.generated_questions.iter().map(|q| &q.id).collect();
        prop_assert_eq!(ids.len(), analysis.generated_questions.len());
        if analysis.possible_conditions.is_empty() {
            prop_assert_eq!(&analysis.generated_questions[0].id, "general_1");
        }
    }

    #[test]
    fn analysis_risk_follows_urgency(symptoms in symptom_text()) {
        let analysis = engine::analyze(&patient(&symptoms));
        let immediate = analysis
            .possible_conditions
            .iter()
            .any(|d| d.urgency == Urgency::Immediate);

        prop_assert_eq!(immediate, analysis.risk_level == RiskLevel::Critical);
        prop_assert_eq!(analysis.risk_level, engine::risk_level(&analysis.possible_conditions));
    }

    #[test]
    fn analysis_is_deterministic(symptoms in symptom_text()) {
        let patient = patient(&symptoms);
        prop_assert_eq!(engine::analyze(&patient), engine::analyze(&patient));
    }

    #[test]
    fn confidence_thresholds(probability in 0.0..=1.0f64) {
        let expected = if probability > 0.7 {
            Confidence::High
        } else if probability > 0.5 {
            Confidence::Medium
        } else {
            Confidence::Low
        };
        prop_assert_eq!(Confidence::from_probability(probability), expected);
    }

    #[test]
    fn refinement_keeps_probabilities_valid(
        symptoms in symptom_text(),
        values in prop::collection::vec(answer_value(), 0..12),
        category_match in any::<bool>(),
    ) {
        let mut prior = engine::analyze(&patient(&symptoms));
        if category_match {
            // Route questions at the first diagnosis so answers move it.
            if let Some(key) = prior.possible_conditions.first().map(|d| d.key()) {
                for question in &mut prior.generated_questions {
                    question.category.clone_from(&key);
                }
            }
        }
        let answers: Vec<Answer> = prior
            .generated_questions
            .iter()
            .cycle()
            .zip(values)
            .map(|(question, value)| Answer::new(question.id.clone(), value))
            .collect();

        let refined = engine::refine(&answers, &prior);

        prop_assert_eq!(refined.possible_conditions.len(), prior.possible_conditions.len());
        prop_assert_eq!(refined.risk_level, prior.risk_level);
        prop_assert_eq!(&refined.generated_questions, &prior.generated_questions);
        for diagnosis in &refined.possible_conditions {
            prop_assert!((0.0..=1.0).contains(&diagnosis.probability));
            prop_assert_eq!(
                diagnosis.confidence,
                Confidence::from_probability(diagnosis.probability)
            );
        }
        for pair in refined.possible_conditions.windows(2) {
            prop_assert!(pair[0].probability >= pair[1].probability);
        }
    }

    #[test]
    fn refinement_ignores_unknown_questions(
        symptoms in symptom_text(),
        values in prop::collection::vec(answer_value(), 0..8),
    ) {
        let prior = engine::analyze(&patient(&symptoms));
        let answers: Vec<Answer> = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Answer::new(format!("desconhecida_{i}"), value))
            .collect();

        prop_assert_eq!(engine::refine(&answers, &prior), prior);
    }
}
