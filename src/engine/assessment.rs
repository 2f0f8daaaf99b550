//! Recommendation tables and assessment text.

use crate::model::{Diagnosis, RiskLevel, Urgency};

const DEFAULT_RECOMMENDATION: &str = "Procurar atendimento médico para avaliação";

/// Recommendations for a condition, by display name.
#[must_use]
pub fn condition_recommendations(name: &str) -> Vec<String> {
    let items: &[&str] = match name {
        "Angina de Peito" => &[
            "Repouso imediato",
            "Evitar esforço físico",
            "Procurar atendimento médico urgente",
            "Considerar uso de nitroglicerina se prescrita",
        ],
        "Infarto Agudo do Miocárdio" => &[
            "ATENÇÃO: Procure atendimento médico IMEDIATAMENTE",
            "Chame SAMU (192) ou vá ao hospital mais próximo",
            "Não dirija sozinho",
            "Mantenha repouso absoluto",
        ],
        "Enxaqueca" => &[
            "Repouso em ambiente escuro e silencioso",
            "Hidratação adequada",
            "Evitar estímulos visuais e sonoros",
            "Considerar analgésico se prescrito",
        ],
        "Asma" => &[
            "Usar inalador de resgate se disponível",
            "Manter posição confortável",
            "Respiração lenta e profunda",
            "Procurar atendimento se não melhorar",
        ],
        _ => &[DEFAULT_RECOMMENDATION],
    };
    to_strings(items)
}

/// Next steps for the health worker, by probability band.
#[must_use]
pub fn next_steps(probability: f64) -> Vec<String> {
    let items: &[&str] = if probability > 0.8 {
        &[
            "Encaminhar para atendimento médico urgente",
            "Coletar sinais vitais",
            "Documentar todos os sintomas",
            "Preparar para transporte se necessário",
        ]
    } else if probability > 0.6 {
        &[
            "Agendar consulta médica em 24-48 horas",
            "Monitorar sintomas",
            "Orientar sobre sinais de alerta",
            "Fornecer orientações de cuidado",
        ]
    } else {
        &[
            "Monitorar evolução dos sintomas",
            "Orientar sobre cuidados gerais",
            "Retornar se sintomas piorarem",
            "Manter acompanhamento",
        ]
    };
    to_strings(items)
}

/// General recommendations for a risk level.
#[must_use]
pub fn general_recommendations(risk: RiskLevel) -> Vec<String> {
    let items: &[&str] = match risk {
        RiskLevel::Critical => &[
            "ATENÇÃO: Risco crítico identificado",
            "Encaminhar IMEDIATAMENTE para atendimento médico",
            "Chamar SAMU (192) se necessário",
            "Manter paciente em repouso absoluto",
        ],
        RiskLevel::High => &[
            "Encaminhar para atendimento médico urgente",
            "Monitorar sinais vitais constantemente",
            "Documentar todos os sintomas",
            "Preparar para transporte médico",
        ],
        RiskLevel::Medium => &[
            "Agendar consulta médica em 24-48 horas",
            "Monitorar evolução dos sintomas",
            "Orientar sobre sinais de alerta",
            "Fornecer orientações de cuidado",
        ],
        RiskLevel::Low => &[
            "Monitorar evolução dos sintomas",
            "Orientar sobre cuidados gerais",
            "Retornar se sintomas piorarem",
            "Manter acompanhamento regular",
        ],
    };
    to_strings(items)
}

/// General recommendations for a risk level given by wire name.
///
/// Unknown names get the low tier.
#[must_use]
pub fn general_recommendations_for(risk: &str) -> Vec<String> {
    general_recommendations(RiskLevel::parse(risk).unwrap_or_default())
}

/// Initial assessment text for the symptom description and sorted diagnoses.
#[must_use]
pub fn initial_assessment(symptoms: &str, conditions: &[Diagnosis]) -> String {
    match conditions.first() {
        Some(top) => {
            let warning = if top.urgency == Urgency::Immediate {
                "ATENÇÃO: Esta condição requer atendimento médico IMEDIATO."
            } else {
                ""
            };
            format!(
                "Baseado nos sintomas relatados (\"{symptoms}\"), há uma probabilidade de {}% \
                 de que o paciente apresente {}. {warning}",
                top.percentage(),
                top.condition,
            )
        }
        None => format!(
            "Os sintomas relatados (\"{symptoms}\") requerem investigação adicional. \
             Será necessário fazer algumas perguntas específicas para melhor avaliar a \
             condição do paciente."
        ),
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}
