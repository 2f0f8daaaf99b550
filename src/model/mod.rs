//! Intake data model.
//!
//! This module defines the records exchanged between the intake UI, the
//! local diagnostic engine and the AI-backed assistant:
//! - [`PatientData`] and [`VitalSigns`]: what the health worker submits
//! - [`Question`] and [`Answer`]: follow-up questioning
//! - [`Diagnosis`]: a scored condition for one patient
//! - [`Analysis`]: the engine output consumed by the report
//!
//! JSON uses camelCase keys so the same shape can be requested from the
//! completion API and returned to the UI.

mod analysis;
mod answer;
mod diagnosis;
mod patient;
mod question;

pub use analysis::{Analysis, RiskLevel};
pub use answer::{Answer, AnswerValue};
pub use diagnosis::{condition_key, Confidence, Diagnosis, Urgency};
pub use patient::{Gender, PatientData, VitalSigns, MAX_AGE, MIN_AGE};
pub use question::{Priority, Question, QuestionType};
