//! Follow-up questions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Boolean answer.
    YesNo,
    /// One of the listed options.
    MultipleChoice,
    /// Number from 1 to 10.
    Scale,
    /// Free text.
    Text,
}

impl QuestionType {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YesNo => "yes_no",
            Self::MultipleChoice => "multiple_choice",
            Self::Scale => "scale",
            Self::Text => "text",
        }
    }

    /// Parse a wire name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "yes_no" => Some(Self::YesNo),
            "multiple_choice" => Some(Self::MultipleChoice),
            "scale" => Some(Self::Scale),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

/// Question priority shown to the health worker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Wire name of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Parse a wire name, case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// A follow-up question. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Question {
    /// Question identifier, referenced by answers.
    pub id: String,
    /// Question text.
    pub text: String,
    /// Answer type.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Choices, only for multiple-choice questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Knowledge-base category key, or `general`.
    pub category: String,
    /// Key of the condition that produced the question, if any.
    ///
    /// Stored at generation time; answers still link to diagnoses through
    /// [`category`](Self::category).
    #[serde(
        default,
        rename = "conditionKey",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(skip)]
    pub condition_key: Option<String>,
    /// Priority.
    pub priority: Priority,
}

impl Question {
    /// Create a yes/no question.
    #[must_use]
    pub fn yes_no(
        id: impl Into<String>,
        text: impl Into<String>,
        category: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            question_type: QuestionType::YesNo,
            options: None,
            category: category.into(),
            condition_key: None,
            priority,
        }
    }

    /// Create a multiple-choice question.
    #[must_use]
    pub fn multiple_choice(
        id: impl Into<String>,
        text: impl Into<String>,
        options: Vec<String>,
        category: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            question_type: QuestionType::MultipleChoice,
            options: Some(options),
            category: category.into(),
            condition_key: None,
            priority,
        }
    }

    /// Record the condition this question was generated for.
    #[must_use]
    pub fn with_condition_key(mut self, key: impl Into<String>) -> Self {
        self.condition_key = Some(key.into());
        self
    }
}
