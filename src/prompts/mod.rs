//! Prompt templates for the completion API.
//!
//! - [`analysis_prompt`]: preliminary analysis from intake data
//! - [`refinement_prompt`]: updated analysis from follow-up answers
//!
//! Prompts are written in Portuguese, the language of the health workers
//! and of the knowledge base. Both ask for a single JSON object shaped like
//! [`Analysis`]; the JSON Schema appended to the analysis prompt is
//! generated from that type.
//!
//! # Example
//!
//! ```
//! use triage_assist::model::{Gender, PatientData};
//! use triage_assist::prompts::analysis_prompt;
//!
//! let patient = PatientData::new("Ana", 34, Gender::Female, "falta de ar");
//! let prompt = analysis_prompt(&patient);
//! assert!(prompt.contains("- Sintomas: falta de ar"));
//! assert!(prompt.contains("- Medicações atuais: Nenhuma"));
//! ```

use std::fmt::Write as _;
use std::sync::LazyLock;

use crate::model::{Analysis, Answer, PatientData};

/// System prompt shared by both requests.
pub const SYSTEM_PROMPT: &str = "Você é um assistente médico especializado em diagnóstico \
para agentes de saúde em locais remotos do Brasil. Responda sempre com um único objeto JSON, \
sem texto adicional.";

const NOT_INFORMED: &str = "Não informado";
const NO_MEDICATIONS: &str = "Nenhuma";

static ANALYSIS_SCHEMA: LazyLock<String> = LazyLock::new(|| {
    let schema = schemars::schema_for!(Analysis);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
});

/// JSON Schema of [`Analysis`], pretty-printed.
#[must_use]
pub fn analysis_schema() -> &'static str {
    &ANALYSIS_SCHEMA
}

/// Prompt asking for a preliminary analysis of the patient.
#[must_use]
pub fn analysis_prompt(patient: &PatientData) -> String {
    let history = non_blank_or(&patient.medical_history, NOT_INFORMED);
    let medications = non_blank_or(&patient.current_medications, NO_MEDICATIONS);
    let vitals = patient
        .vital_signs
        .as_ref()
        .and_then(|v| serde_json::to_string(v).ok())
        .unwrap_or_else(|| "{}".to_string());

    let mut prompt = String::new();
    prompt.push_str(
        "Analise os sintomas do paciente e forneça uma análise médica estruturada.\n\n",
    );

    prompt.push_str("DADOS DO PACIENTE:\n");
    let _ = writeln!(prompt, "- Nome: {}", patient.name);
    let _ = writeln!(prompt, "- Idade: {} anos", patient.age);
    let _ = writeln!(prompt, "- Sexo: {}", patient.gender.code());
    let _ = writeln!(prompt, "- Sintomas: {}", patient.symptoms);
    let _ = writeln!(prompt, "- Histórico médico: {history}");
    let _ = writeln!(prompt, "- Medicações atuais: {medications}");
    let _ = writeln!(prompt, "- Sinais vitais: {vitals}");

    prompt.push_str(
        "\nINSTRUÇÕES:\n\
         1. Analise os sintomas e identifique possíveis condições médicas\n\
         2. Para cada condição, calcule uma probabilidade (0-1)\n\
         3. Determine o nível de urgência (immediate, urgent, moderate, low)\n\
         4. Gere 3-5 perguntas específicas para confirmar o diagnóstico\n\
         5. Forneça recomendações baseadas na condição\n\n\
         IMPORTANTE:\n\
         - Seja conservador com diagnósticos críticos\n\
         - Priorize condições que requerem atenção imediata\n\
         - Use linguagem clara para agentes de saúde\n\
         - Considere o contexto de locais remotos do Brasil\n\
         - Foque em condições comuns e tratáveis\n\n\
         FORMATO DE RESPOSTA (JSON Schema):\n",
    );
    prompt.push_str(analysis_schema());
    prompt.push('\n');

    prompt
}

/// Prompt asking the model to refine `current` given the answers.
///
/// Answers to unknown question ids are still listed, with an empty question.
#[must_use]
pub fn refinement_prompt(answers: &[Answer], current: &Analysis) -> String {
    let current_json = serde_json::to_string_pretty(current).unwrap_or_default();

    let answers_text = answers
        .iter()
        .map(|answer| {
            let question = current
                .question(&answer.question_id)
                .map_or("", |q| q.text.as_str());
            format!("Pergunta: {question}\nResposta: {}", answer.value)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Com base nas respostas adicionais do paciente, refine o diagnóstico inicial.\n\n\
         ANÁLISE INICIAL:\n{current_json}\n\n\
         RESPOSTAS ADICIONAIS:\n{answers_text}\n\n\
         INSTRUÇÕES:\n\
         1. Ajuste as probabilidades das condições baseado nas novas respostas\n\
         2. Atualize o nível de confiança\n\
         3. Mantenha o mesmo formato JSON da análise inicial\n\
         4. Se necessário, adicione novas condições identificadas\n\
         5. Atualize as recomendações baseado na nova informação\n\n\
         Retorne apenas o JSON atualizado.\n"
    )
}

fn non_blank_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}
