//! Intake wizard workflow tests.
//!
//! Walk a session from welcome to report with the local engine and with a
//! scripted completion client.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use triage_assist::assistant::DiagnosticAssistant;
use triage_assist::error::SessionError;
use triage_assist::model::{Answer, Gender, PatientData, RiskLevel, VitalSigns};
use triage_assist::report::DiagnosticReport;
use triage_assist::session::{Session, Step};

use super::support::ScriptedClient;

fn patient() -> PatientData {
    PatientData::new("Josefa", 66, Gender::Female, "aperto no peito e tontura")
        .with_medications("losartana")
        .with_vital_signs(VitalSigns {
            blood_pressure: Some("170/100".into()),
            hypertension_diagnosed: Some(true),
            ..VitalSigns::default()
        })
}

#[tokio::test]
async fn test_local_workflow_to_report() {
    let assistant = DiagnosticAssistant::<ScriptedClient>::local_only();
    let mut session = Session::new();

    session.start().unwrap();
    let patient = patient();
    patient.validate().unwrap();
    let analysis = assistant.analyze_symptoms(&patient).await;
    assert_eq!(analysis.possible_conditions.len(), 2);
    session.submit_intake(patient, analysis).unwrap();
    assert_eq!(session.step(), Step::Questions);

    let questions = session.analysis().unwrap().generated_questions.clone();
    assert_eq!(questions.len(), 5);
    for (i, question) in questions.iter().enumerate() {
        let answer = if i % 2 == 0 { "Sim" } else { "Não" };
        session
            .record_answer(Answer::new(question.id.clone(), answer))
            .unwrap();
    }

    let refined = assistant
        .refine_diagnosis(session.answers(), session.analysis().unwrap())
        .await;
    session.complete(refined).unwrap();
    assert_eq!(session.step(), Step::Report);

    let report = DiagnosticReport::build(
        session.patient().unwrap(),
        session.analysis().unwrap(),
        session.answers(),
    );
    assert_eq!(report.answers_count, 5);
    assert_eq!(report.conditions_count, 2);
    assert!(report.to_string().contains("Paciente: Josefa | Idade: 66 anos"));

    let summary = assistant.metrics().summary();
    assert_eq!(summary.local_invocations, 2);
    assert_eq!(summary.remote_invocations, 0);
}

#[tokio::test]
async fn test_remote_workflow_uses_model_questions() {
    let client = ScriptedClient::new(vec![
        Ok(r#"{
            "initialAssessment": "Possível evento cardíaco.",
            "possibleConditions": [
                {"condition": "Angina de Peito", "probability": 0.6, "urgency": "urgent"}
            ],
            "generatedQuestions": [
                {"id": "c1", "text": "A dor piora ao subir escadas?", "category": "angina_de_peito"}
            ],
            "riskLevel": "high",
            "recommendations": ["Procurar unidade de saúde hoje"]
        }"#),
        Ok(r#"{
            "possibleConditions": [
                {"condition": "Angina de Peito", "probability": 0.82, "confidence": "high",
                 "urgency": "urgent"}
            ],
            "riskLevel": "high"
        }"#),
    ]);
    let assistant = DiagnosticAssistant::new(client);
    let mut session = Session::new();
    session.start().unwrap();

    let patient = patient();
    let analysis = assistant.analyze_symptoms(&patient).await;
    assert_eq!(analysis.initial_assessment, "Possível evento cardíaco.");
    session.submit_intake(patient, analysis).unwrap();

    session.record_answer(Answer::new("c1", true)).unwrap();
    let refined = assistant
        .refine_diagnosis(session.answers(), session.analysis().unwrap())
        .await;

    assert_eq!(refined.possible_conditions[0].percentage(), 82);
    assert_eq!(refined.initial_assessment, "Possível evento cardíaco.");
    assert_eq!(refined.generated_questions[0].id, "c1");
    assert_eq!(refined.risk_level, RiskLevel::High);

    session.complete(refined).unwrap();
    let report = DiagnosticReport::build(
        session.patient().unwrap(),
        session.analysis().unwrap(),
        session.answers(),
    );
    assert_eq!(report.confidence_label, "Alto");
    assert_eq!(report.emergency_contacts.len(), 2);
}

#[tokio::test]
async fn test_prompts_carry_intake_and_answers() {
    let client = ScriptedClient::new(vec![Ok("{}"), Ok("{}")]);
    let assistant = DiagnosticAssistant::new(client.clone());

    let patient = patient();
    let analysis = assistant.analyze_symptoms(&patient).await;
    let answers = vec![Answer::new("inexistente", "Sim")];
    let _ = assistant.refine_diagnosis(&answers, &analysis).await;

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("- Nome: Josefa"));
    assert!(prompts[0].contains("- Medicações atuais: losartana"));
    assert!(prompts[0].contains(r#""hypertensionDiagnosed":true"#));
    assert!(prompts[1].contains("Pergunta: \nResposta: Sim"));

    assert!(format!("{assistant:?}").contains("remote_enabled: true"));
    let summary = assistant.metrics().summary();
    assert_eq!(summary.remote_invocations, 2);
    assert!(summary.recent_fallbacks.is_empty());
}

#[test]
fn test_wizard_rejects_skipping_steps() {
    let mut session = Session::new();
    let err = session.complete(triage_assist::engine::analyze(&patient()));

    assert_eq!(
        err,
        Err(SessionError::InvalidTransition {
            from: "welcome".to_string(),
            to: "report".to_string(),
        })
    );
}

#[test]
fn test_back_and_reset() {
    let mut session = Session::new();
    session.start().unwrap();
    let patient = patient();
    let analysis = triage_assist::engine::analyze(&patient);
    session.submit_intake(patient, analysis).unwrap();
    session.record_answer(Answer::new("q", false)).unwrap();

    session.back_to_data_entry().unwrap();
    assert_eq!(session.answers().len(), 1);

    session.reset();
    assert_eq!(session.step(), Step::Welcome);
    assert!(session.answers().is_empty());
    assert!(session.patient().is_none());
}
