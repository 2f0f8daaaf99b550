//! Intake wizard session.
//!
//! A [`Session`] walks one patient through the wizard:
//!
//! ```text
//! Welcome ──start──► DataEntry ──submit_intake──► Questions ──complete──► Report
//!    ▲                   ▲                           │  ▲                    │
//!    │                   └──── back_to_data_entry ───┘  └─ back_to_questions ┘
//!    └────────────────────────────── reset (from any step) ──────────────────┘
//! ```
//!
//! Transitions not in the diagram return
//! [`SessionError::InvalidTransition`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::model::{Analysis, Answer, PatientData};
use crate::traits::{RealTimeProvider, TimeProvider};

/// Wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Landing screen.
    #[default]
    Welcome,
    /// Patient intake form.
    DataEntry,
    /// Follow-up questions.
    Questions,
    /// Final report.
    Report,
}

impl Step {
    /// Snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::DataEntry => "data_entry",
            Self::Questions => "questions",
            Self::Report => "report",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One patient's pass through the wizard.
pub struct Session<T: TimeProvider = RealTimeProvider> {
    id: String,
    step: Step,
    patient: Option<PatientData>,
    analysis: Option<Analysis>,
    answers: Vec<Answer>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    time: T,
}

impl<T: TimeProvider> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("step", &self.step)
            .field("answers", &self.answers.len())
            .field("created_at", &self.created_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_time_provider(RealTimeProvider)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeProvider> Session<T> {
    /// Create a session using `time` for timestamps.
    #[must_use]
    pub fn with_time_provider(time: T) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            step: Step::Welcome,
            patient: None,
            analysis: None,
            answers: Vec::new(),
            created_at: time.now(),
            completed_at: None,
            time,
        }
    }

    /// Session id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current step.
    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    /// Patient from the intake form, once submitted.
    #[must_use]
    pub const fn patient(&self) -> Option<&PatientData> {
        self.patient.as_ref()
    }

    /// Current analysis, once produced.
    #[must_use]
    pub const fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// Answers recorded so far, in order.
    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time the report was produced.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Welcome → data entry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside the welcome step.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.transition(&[Step::Welcome], Step::DataEntry)
    }

    /// Data entry → questions, storing the patient and its analysis.
    ///
    /// Answers from a previous pass are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside data entry.
    pub fn submit_intake(
        &mut self,
        patient: PatientData,
        analysis: Analysis,
    ) -> Result<(), SessionError> {
        self.transition(&[Step::DataEntry], Step::Questions)?;
        self.patient = Some(patient);
        self.analysis = Some(analysis);
        self.answers.clear();
        self.completed_at = None;
        Ok(())
    }

    /// Append an answer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside the questions step.
    pub fn record_answer(&mut self, answer: Answer) -> Result<(), SessionError> {
        self.require(Step::Questions, Step::Questions)?;
        self.answers.push(answer);
        Ok(())
    }

    /// Questions → report, replacing the analysis with the refined one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside the questions
    /// step, or [`SessionError::MissingAnalysis`] if no analysis exists.
    pub fn complete(&mut self, refined: Analysis) -> Result<(), SessionError> {
        self.require(Step::Questions, Step::Report)?;
        if self.analysis.is_none() {
            return Err(SessionError::MissingAnalysis);
        }
        self.analysis = Some(refined);
        self.step = Step::Report;
        self.completed_at = Some(self.time.now());
        Ok(())
    }

    /// Report → questions.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside the report step.
    pub fn back_to_questions(&mut self) -> Result<(), SessionError> {
        self.transition(&[Step::Report], Step::Questions)?;
        self.completed_at = None;
        Ok(())
    }

    /// Questions or report → data entry. Patient and answers are kept so
    /// the form can be edited.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] from welcome or data entry.
    pub fn back_to_data_entry(&mut self) -> Result<(), SessionError> {
        self.transition(&[Step::Questions, Step::Report], Step::DataEntry)?;
        self.completed_at = None;
        Ok(())
    }

    /// Any step → welcome, clearing all data.
    pub fn reset(&mut self) {
        tracing::debug!(session_id = %self.id, from = %self.step, "Session reset");
        self.step = Step::Welcome;
        self.patient = None;
        self.analysis = None;
        self.answers.clear();
        self.completed_at = None;
    }

    fn transition(&mut self, allowed: &[Step], to: Step) -> Result<(), SessionError> {
        if !allowed.contains(&self.step) {
            return Err(self.invalid(to));
        }
        tracing::debug!(session_id = %self.id, from = %self.step, to = %to, "Session transition");
        self.step = to;
        Ok(())
    }

    fn require(&self, step: Step, to: Step) -> Result<(), SessionError> {
        if self.step == step {
            Ok(())
        } else {
            Err(self.invalid(to))
        }
    }

    fn invalid(&self, to: Step) -> SessionError {
        SessionError::InvalidTransition {
            from: self.step.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine;
    use crate::model::Gender;
    use crate::test_utils::{mock_time, test_patient};
    use crate::traits::MockTimeProvider;
    use chrono::TimeZone;

    fn patient() -> PatientData {
        PatientData::new("Ana", 30, Gender::Female, "dor de cabeça e tontura")
    }

    fn at_questions() -> Session {
        let mut session = Session::new();
        session.start().unwrap();
        let patient = patient();
        let analysis = engine::analyze(&patient);
        session.submit_intake(patient, analysis).unwrap();
        session
    }

    #[test]
    fn test_new_session() {
        let session = Session::new();
        assert_eq!(session.step(), Step::Welcome);
        assert!(Uuid::parse_str(session.id()).is_ok());
        assert!(session.patient().is_none());
        assert!(session.analysis().is_none());
        assert!(session.completed_at().is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Session::new().id(), Session::new().id());
    }

    #[test]
    fn test_happy_path() {
        let mut session = at_questions();
        assert_eq!(session.step(), Step::Questions);
        assert_eq!(session.patient().unwrap().name, "Ana");

        let question_id = session.analysis().unwrap().generated_questions[0].id.clone();
        session.record_answer(Answer::new(question_id, true)).unwrap();
        session.record_answer(Answer::new("outra", "Não")).unwrap();
        assert_eq!(session.answers().len(), 2);

        let refined = engine::refine(session.answers(), session.analysis().unwrap());
        session.complete(refined).unwrap();
        assert_eq!(session.step(), Step::Report);
        assert!(session.completed_at().is_some());
    }

    #[test]
    fn test_completed_at_uses_time_provider() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let finished = Utc.with_ymd_and_hms(2024, 5, 1, 8, 20, 0).unwrap();
        let mut time = MockTimeProvider::new();
        let mut calls = 0;
        time.expect_now().returning(move || {
            calls += 1;
            if calls == 1 {
                created
            } else {
                finished
            }
        });

        let mut session = Session::with_time_provider(time);
        session.start().unwrap();
        let analysis = engine::analyze(&patient());
        session.submit_intake(patient(), analysis.clone()).unwrap();
        session.complete(analysis).unwrap();

        assert_eq!(session.created_at(), created);
        assert_eq!(session.completed_at(), Some(finished));
    }

    #[test]
    fn test_fixed_clock() {
        let time = Utc.with_ymd_and_hms(2024, 6, 10, 9, 30, 0).unwrap();
        let mut session = Session::with_time_provider(mock_time(time));
        session.start().unwrap();
        let patient = test_patient("tosse");
        let analysis = engine::analyze(&patient);
        session.submit_intake(patient, analysis.clone()).unwrap();
        session.complete(analysis).unwrap();

        assert_eq!(session.created_at(), time);
        assert_eq!(session.completed_at(), Some(time));
    }

    #[test]
    fn test_invalid_transitions() {
        let mut session = Session::new();
        assert_eq!(
            session.record_answer(Answer::new("q", true)),
            Err(SessionError::InvalidTransition {
                from: "welcome".to_string(),
                to: "questions".to_string(),
            })
        );
        assert!(session.submit_intake(patient(), engine::analyze(&patient())).is_err());
        assert!(session.back_to_questions().is_err());
        assert!(session.back_to_data_entry().is_err());

        session.start().unwrap();
        assert!(session.start().is_err());
        assert!(session.complete(engine::analyze(&patient())).is_err());
    }

    #[test]
    fn test_back_navigation() {
        let mut session = at_questions();
        session.complete(session.analysis().unwrap().clone()).unwrap();

        session.back_to_questions().unwrap();
        assert_eq!(session.step(), Step::Questions);
        assert!(session.completed_at().is_none());

        session.back_to_data_entry().unwrap();
        assert_eq!(session.step(), Step::DataEntry);
        assert!(session.patient().is_some());
    }

    #[test]
    fn test_resubmit_clears_answers() {
        let mut session = at_questions();
        session.record_answer(Answer::new("q", true)).unwrap();
        session.back_to_data_entry().unwrap();

        let patient = patient().with_medical_history("enxaqueca");
        let analysis = engine::analyze(&patient);
        session.submit_intake(patient, analysis).unwrap();

        assert!(session.answers().is_empty());
        assert_eq!(session.patient().unwrap().medical_history, "enxaqueca");
    }

    #[test]
    fn test_reset_from_any_step() {
        let mut session = at_questions();
        let id = session.id().to_string();
        session.record_answer(Answer::new("q", true)).unwrap();

        session.reset();

        assert_eq!(session.step(), Step::Welcome);
        assert_eq!(session.id(), id);
        assert!(session.patient().is_none());
        assert!(session.analysis().is_none());
        assert!(session.answers().is_empty());
    }

    #[test]
    fn test_step_names() {
        assert_eq!(Step::DataEntry.as_str(), "data_entry");
        assert_eq!(serde_json::to_string(&Step::Report).unwrap(), r#""report""#);
        assert_eq!(Step::default(), Step::Welcome);
    }
}
