//! Command-line pipeline tests: analyze → refine → report through
//! [`cli::run`], the way the binary chains them over stdin/stdout.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::{json, Value};

use triage_assist::assistant::DiagnosticAssistant;
use triage_assist::cli::{self, Command};
use triage_assist::error::AppError;
use triage_assist::model::Analysis;

use super::support::ScriptedClient;

fn local() -> DiagnosticAssistant<ScriptedClient> {
    DiagnosticAssistant::local_only()
}

#[tokio::test]
async fn test_analyze_refine_report() {
    let assistant = local();
    let patient = json!({
        "name": "Francisca",
        "age": 38,
        "gender": "F",
        "symptoms": "falta de ar e chiado no peito",
        "medicalHistory": "asma na infância"
    });

    let analysis_json = cli::run(Command::Analyze, &assistant, &patient.to_string())
        .await
        .unwrap();
    let analysis: Value = serde_json::from_str(&analysis_json).unwrap();
    assert_eq!(analysis["possibleConditions"][0]["condition"], "Asma");
    assert_eq!(analysis["riskLevel"], "low");

    let question_id = analysis["generatedQuestions"][0]["id"].clone();
    let answers = json!([{ "questionId": question_id, "value": "Sim" }]);
    let refine_input = json!({ "analysis": analysis, "answers": answers });
    let refined_json = cli::run(Command::Refine, &assistant, &refine_input.to_string())
        .await
        .unwrap();
    let refined: Analysis = serde_json::from_str(&refined_json).unwrap();

    let report_input = json!({ "patient": patient, "analysis": refined, "answers": answers });
    let text = cli::run(
        Command::Report { json: false },
        &assistant,
        &report_input.to_string(),
    )
    .await
    .unwrap();

    assert!(text.contains("Paciente: Francisca | Idade: 38 anos"));
    assert!(text.contains("1. Asma ("));
    assert!(text.contains("Perguntas Respondidas: 1"));
    assert!(!text.contains("Contatos de Emergência"));
}

#[tokio::test]
async fn test_analyze_rejects_missing_fields() {
    let err = cli::run(Command::Analyze, &local(), r#"{"name": "Ana"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_analyze_rejects_blank_symptoms() {
    let input = r#"{"name": "Ana", "age": 30, "gender": "F", "symptoms": "  "}"#;
    let err = cli::run(Command::Analyze, &local(), input).await.unwrap_err();
    assert!(err.to_string().contains("symptoms"));
}

#[tokio::test]
async fn test_remote_analyze_through_cli() {
    let client = ScriptedClient::new(vec![Ok(
        r#"{"initialAssessment": "Crise asmática provável.", "riskLevel": "medium"}"#,
    )]);
    let assistant = DiagnosticAssistant::new(client);
    let input = r#"{"name": "Ana", "age": 30, "gender": "F", "symptoms": "chiado no peito"}"#;

    let output = cli::run(Command::Analyze, &assistant, input).await.unwrap();
    let analysis: Analysis = serde_json::from_str(&output).unwrap();

    assert_eq!(analysis.initial_assessment, "Crise asmática provável.");
    assert!(analysis.possible_conditions.is_empty());
}
