//! Fallback and recovery tests.
//!
//! Every failure of the remote path must leave the caller with a usable
//! analysis and leave a trace in the metrics.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use triage_assist::assistant::{DiagnosticAssistant, OP_ANALYZE, OP_REFINE};
use triage_assist::engine;
use triage_assist::model::{Answer, Gender, PatientData, RiskLevel};

use super::support::ScriptedClient;

fn patient() -> PatientData {
    PatientData::new("Raimundo", 54, Gender::Male, "dor de cabeça intensa e tontura")
}

#[tokio::test]
async fn test_api_down_falls_back_to_engine() {
    let assistant = DiagnosticAssistant::new(ScriptedClient::new(vec![Err("timeout")]));

    let analysis = assistant.analyze_symptoms(&patient()).await;

    assert_eq!(analysis, engine::analyze(&patient()));
    let fallbacks = assistant.metrics().fallbacks();
    assert_eq!(fallbacks.len(), 1);
    assert_eq!(fallbacks[0].operation, OP_ANALYZE);
    assert!(fallbacks[0].reason.contains("timeout"));
}

#[tokio::test]
async fn test_each_malformed_response_falls_back() {
    let responses = [
        "Não consegui analisar.",
        "```json\n{ \"initialAssessment\": \n```",
        r#"["not", "an", "object"]"#,
        r#"{"possibleConditions": [{"probability": 0.5}]}"#,
        r#"{"possibleConditions": [{"condition": "Gripe", "probability": "alta"}]}"#,
        r#"{"possibleConditions": [{"condition": "Gripe", "probability": 7}]}"#,
        r#"{"generatedQuestions": [{"id": "q1"}]}"#,
    ];

    for response in responses {
        let assistant = DiagnosticAssistant::new(ScriptedClient::new(vec![Ok(response)]));

        let analysis = assistant.analyze_symptoms(&patient()).await;

        assert_eq!(analysis, engine::analyze(&patient()), "response: {response}");
        assert_eq!(assistant.metrics().fallbacks().len(), 1, "response: {response}");
    }
}

#[tokio::test]
async fn test_recovers_after_transient_failure() {
    let assistant = DiagnosticAssistant::new(ScriptedClient::new(vec![
        Err("connection reset"),
        Ok(r#"{"initialAssessment": "Remota", "riskLevel": "medium"}"#),
    ]));

    let first = assistant.analyze_symptoms(&patient()).await;
    let second = assistant.analyze_symptoms(&patient()).await;

    assert_eq!(first, engine::analyze(&patient()));
    assert_eq!(second.initial_assessment, "Remota");
    assert_eq!(second.risk_level, RiskLevel::Medium);

    let summary = assistant.metrics().summary();
    let analyze = &summary.by_operation[OP_ANALYZE];
    assert_eq!(summary.remote_invocations, 2);
    assert_eq!(summary.local_invocations, 1);
    assert_eq!(analyze.total_invocations, 3);
    assert_eq!(analyze.failed, 1);
}

#[tokio::test]
async fn test_refine_failure_keeps_prior() {
    let assistant = DiagnosticAssistant::new(ScriptedClient::new(vec![]));
    let prior = engine::analyze(&patient());
    let answers = vec![Answer::new("enxaqueca_q0", "Sim")];

    let refined = assistant.refine_diagnosis(&answers, &prior).await;

    assert_eq!(refined, prior);
    let fallbacks = assistant.metrics().fallbacks();
    assert_eq!(fallbacks[0].operation, OP_REFINE);
    assert!(fallbacks[0].reason.contains("script exhausted"));
}

#[tokio::test]
async fn test_engine_output_survives_any_fallback() {
    let assistant = DiagnosticAssistant::new(ScriptedClient::new(vec![Err("503")]));

    let analysis = assistant.analyze_symptoms(&patient()).await;

    assert!(!analysis.initial_assessment.is_empty());
    assert!(!analysis.generated_questions.is_empty());
    assert!(analysis.generated_questions.len() <= engine::MAX_QUESTIONS);
    assert!(!analysis.recommendations.is_empty());
}
