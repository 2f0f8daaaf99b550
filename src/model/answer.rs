//! Answers collected during questioning.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Literal affirmative answer used by multiple-choice and text inputs.
const YES: &str = "Sim";

/// Literal negative answer used by multiple-choice and text inputs.
const NO: &str = "Não";

/// The value of an answer. Its shape depends on the question type.
///
/// A JSON `null` (or a missing value) becomes [`AnswerValue::Empty`], which
/// neither confirms nor denies anything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Yes/no answer.
    Bool(bool),
    /// Scale answer.
    Number(f64),
    /// Multiple-choice or free-text answer.
    Text(String),
    /// No value given.
    #[default]
    Empty,
}

impl AnswerValue {
    /// True for `true` and the literal `"Sim"`.
    #[must_use]
    pub fn is_affirmative(&self) -> bool {
        match self {
            Self::Bool(value) => *value,
            Self::Text(text) => text == YES,
            Self::Number(_) | Self::Empty => false,
        }
    }

    /// True for `false` and the literal `"Não"`.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Bool(value) => !*value,
            Self::Text(text) => text == NO,
            Self::Number(_) | Self::Empty => false,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Empty => Ok(()),
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// An answer to a generated question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Id of the answered question.
    pub question_id: String,
    /// The answer value.
    #[serde(default)]
    pub value: AnswerValue,
    /// When the answer was given.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Answer {
    /// Create an answer stamped with the current time.
    #[must_use]
    pub fn new(question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_id: question_id.into(),
            value: value.into(),
            timestamp: Utc::now(),
        }
    }

    /// Replace the timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
