//! Patient intake record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::IntakeError;

/// Minimum accepted patient age in years.
pub const MIN_AGE: u32 = 1;

/// Maximum accepted patient age in years.
pub const MAX_AGE: u32 = 120;

/// Free-text fields sent as `null` by the intake form read as empty.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Patient gender as captured by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    #[serde(rename = "M")]
    Male,
    /// Female.
    #[serde(rename = "F")]
    Female,
    /// Other / not stated.
    #[serde(rename = "O")]
    Other,
}

impl Gender {
    /// Single-letter code used on the wire.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }
}

/// Optional measurements taken during the visit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    /// Blood pressure as written by the health worker (e.g. "120/80").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure: Option<String>,
    /// Height in centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    /// Weight in kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Abdominal circumference in centimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abdominal_circumference_cm: Option<f64>,
    /// Previously diagnosed hypertension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hypertension_diagnosed: Option<bool>,
    /// Previously diagnosed diabetes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diabetes_diagnosed: Option<bool>,
}

impl VitalSigns {
    /// Body mass index (kg/m²), when both height and weight are positive.
    #[must_use]
    pub fn body_mass_index(&self) -> Option<f64> {
        match (self.height_cm, self.weight_kg) {
            (Some(height), Some(weight)) if height > 0.0 && weight > 0.0 => {
                let meters = height / 100.0;
                Some(weight / (meters * meters))
            }
            _ => None,
        }
    }
}

/// Data submitted at intake. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    /// Patient identifier.
    #[serde(default = "generate_patient_id")]
    pub id: String,
    /// Patient name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Gender.
    pub gender: Gender,
    /// Free-text symptom description.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub symptoms: String,
    /// Free-text medical history.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub medical_history: String,
    /// Free-text list of current medications.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub current_medications: String,
    /// Optional vital-sign measurements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vital_signs: Option<VitalSigns>,
    /// When the intake was submitted.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl PatientData {
    /// Create a new intake record with a generated id and the current time.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        age: u32,
        gender: Gender,
        symptoms: impl Into<String>,
    ) -> Self {
        Self {
            id: generate_patient_id(),
            name: name.into(),
            age,
            gender,
            symptoms: symptoms.into(),
            medical_history: String::new(),
            current_medications: String::new(),
            vital_signs: None,
            created_at: Utc::now(),
        }
    }

    /// Set the medical history.
    #[must_use]
    pub fn with_medical_history(mut self, history: impl Into<String>) -> Self {
        self.medical_history = history.into();
        self
    }

    /// Set the current medications.
    #[must_use]
    pub fn with_medications(mut self, medications: impl Into<String>) -> Self {
        self.current_medications = medications.into();
        self
    }

    /// Attach vital signs.
    #[must_use]
    pub fn with_vital_signs(mut self, vital_signs: VitalSigns) -> Self {
        self.vital_signs = Some(vital_signs);
        self
    }

    /// Check the fields the intake form requires before analysis.
    ///
    /// The diagnostic engine does not depend on this; it accepts any record.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidField`] naming the first failing field:
    /// - `name` is blank
    /// - `age` is outside 1–120
    /// - `symptoms` is blank
    pub fn validate(&self) -> Result<(), IntakeError> {
        if self.name.trim().is_empty() {
            return Err(IntakeError::InvalidField {
                field: "name".into(),
                reason: "must not be empty".into(),
            });
        }

        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(IntakeError::InvalidField {
                field: "age".into(),
                reason: format!("must be between {MIN_AGE} and {MAX_AGE}"),
            });
        }

        if self.symptoms.trim().is_empty() {
            return Err(IntakeError::InvalidField {
                field: "symptoms".into(),
                reason: "must not be empty".into(),
            });
        }

        Ok(())
    }
}

fn generate_patient_id() -> String {
    format!("patient_{}", uuid::Uuid::new_v4())
}
