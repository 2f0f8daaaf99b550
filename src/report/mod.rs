//! Diagnostic report.
//!
//! [`DiagnosticReport::build`] collects what the health worker needs at the
//! end of an assessment. `Display` renders it as plain text in Portuguese;
//! `Serialize` gives the same content as JSON.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Analysis, Answer, Confidence, Diagnosis, PatientData, RiskLevel, Urgency};
use crate::traits::{RealTimeProvider, TimeProvider};

/// Label for a risk level.
#[must_use]
pub const fn risk_label(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Critical => "Crítico",
        RiskLevel::High => "Alto",
        RiskLevel::Medium => "Médio",
        RiskLevel::Low => "Baixo",
    }
}

/// Label for a confidence level; `None` reads as low.
#[must_use]
pub const fn confidence_label(confidence: Option<Confidence>) -> &'static str {
    match confidence {
        Some(Confidence::High) => "Alto",
        Some(Confidence::Medium) => "Médio",
        Some(Confidence::Low) | None => "Baixo",
    }
}

/// Label for an urgency.
#[must_use]
pub const fn urgency_label(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Immediate => "Imediato",
        Urgency::Urgent => "Urgente",
        Urgency::Moderate => "Moderado",
        Urgency::Low => "Baixo",
    }
}

/// Emergency contact shown for high and critical risk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    /// Service name.
    pub name: &'static str,
    /// How to reach it.
    pub contact: &'static str,
}

const EMERGENCY_CONTACTS: &[EmergencyContact] = &[
    EmergencyContact {
        name: "SAMU",
        contact: "192",
    },
    EmergencyContact {
        name: "Hospital Mais Próximo",
        contact: "Localizar via GPS",
    },
];

/// One condition in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionEntry {
    /// 1-based position.
    pub rank: usize,
    /// Condition name.
    pub condition: String,
    /// Probability as a rounded percentage.
    pub percentage: i64,
    /// Urgency.
    pub urgency: Urgency,
    /// Urgency label.
    pub urgency_label: &'static str,
    /// Related symptoms.
    pub symptoms: Vec<String>,
    /// Recommendations.
    pub recommendations: Vec<String>,
    /// Next steps.
    pub next_steps: Vec<String>,
}

impl ConditionEntry {
    fn new(rank: usize, diagnosis: &Diagnosis) -> Self {
        Self {
            rank,
            condition: diagnosis.condition.clone(),
            percentage: diagnosis.percentage(),
            urgency: diagnosis.urgency,
            urgency_label: urgency_label(diagnosis.urgency),
            symptoms: diagnosis.symptoms.clone(),
            recommendations: diagnosis.recommendations.clone(),
            next_steps: diagnosis.next_steps.clone(),
        }
    }
}

/// Final report of an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    /// Patient name.
    pub patient_name: String,
    /// Patient age in years.
    pub patient_age: u32,
    /// Overall risk.
    pub risk_level: RiskLevel,
    /// Risk label.
    pub risk_label: &'static str,
    /// Initial assessment text.
    pub initial_assessment: String,
    /// Number of conditions identified.
    pub conditions_count: usize,
    /// Number of questions answered.
    pub answers_count: usize,
    /// Confidence label of the top condition.
    pub confidence_label: &'static str,
    /// Conditions in probability order.
    pub conditions: Vec<ConditionEntry>,
    /// General recommendations.
    pub general_recommendations: Vec<String>,
    /// Present only for high and critical risk.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub emergency_contacts: Vec<EmergencyContact>,
    /// Generation time.
    pub generated_at: DateTime<Utc>,
}

impl DiagnosticReport {
    /// Build a report for the patient from the final analysis, stamped with
    /// the system clock.
    #[must_use]
    pub fn build(patient: &PatientData, analysis: &Analysis, answers: &[Answer]) -> Self {
        Self::build_with_time(&RealTimeProvider, patient, analysis, answers)
    }

    /// Build a report stamped with the time from `time`.
    #[must_use]
    pub fn build_with_time<T: TimeProvider>(
        time: &T,
        patient: &PatientData,
        analysis: &Analysis,
        answers: &[Answer],
    ) -> Self {
        let emergency_contacts = if analysis.risk_level >= RiskLevel::High {
            EMERGENCY_CONTACTS.to_vec()
        } else {
            Vec::new()
        };

        Self {
            patient_name: patient.name.clone(),
            patient_age: patient.age,
            risk_level: analysis.risk_level,
            risk_label: risk_label(analysis.risk_level),
            initial_assessment: analysis.initial_assessment.clone(),
            conditions_count: analysis.possible_conditions.len(),
            answers_count: answers.len(),
            confidence_label: confidence_label(analysis.top_diagnosis().map(|d| d.confidence)),
            conditions: analysis
                .possible_conditions
                .iter()
                .enumerate()
                .map(|(i, d)| ConditionEntry::new(i + 1, d))
                .collect(),
            general_recommendations: analysis.recommendations.clone(),
            emergency_contacts,
            generated_at: time.now(),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "   {title}:")?;
    for item in items {
        writeln!(f, "     - {item}")?;
    }
    Ok(())
}

impl fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RELATÓRIO DE DIAGNÓSTICO")?;
        writeln!(
            f,
            "Paciente: {} | Idade: {} anos",
            self.patient_name, self.patient_age
        )?;
        writeln!(f, "Risco {}", self.risk_label)?;
        writeln!(f)?;

        writeln!(f, "Avaliação Inicial")?;
        writeln!(f, "{}", self.initial_assessment)?;
        writeln!(f)?;

        writeln!(f, "Condições Identificadas: {}", self.conditions_count)?;
        writeln!(f, "Perguntas Respondidas: {}", self.answers_count)?;
        writeln!(f, "Nível de Confiança: {}", self.confidence_label)?;

        if !self.conditions.is_empty() {
            writeln!(f)?;
            writeln!(f, "Possíveis Condições Identificadas")?;
            for entry in &self.conditions {
                writeln!(
                    f,
                    "{}. {} ({}%) - {}",
                    entry.rank, entry.condition, entry.percentage, entry.urgency_label
                )?;
                write_list(f, "Sintomas Relacionados", &entry.symptoms)?;
                write_list(f, "Recomendações", &entry.recommendations)?;
                write_list(f, "Próximos Passos", &entry.next_steps)?;
            }
        }

        if !self.general_recommendations.is_empty() {
            writeln!(f)?;
            writeln!(f, "Recomendações Gerais")?;
            for item in &self.general_recommendations {
                writeln!(f, "- {item}")?;
            }
        }

        if !self.emergency_contacts.is_empty() {
            writeln!(f)?;
            writeln!(f, "Contatos de Emergência")?;
            for contact in &self.emergency_contacts {
                writeln!(f, "- {}: {}", contact.name, contact.contact)?;
            }
        }

        writeln!(f)?;
        write!(
            f,
            "Relatório gerado em {}",
            self.generated_at.format("%d/%m/%Y %H:%M:%S")
        )
    }
}
