//! Follow-up question generation.

use crate::knowledge::Condition;
use crate::model::{Priority, Question};

/// Maximum number of questions in a locally produced analysis.
pub const MAX_QUESTIONS: usize = 5;

/// Category of the generic questions.
pub const GENERAL_CATEGORY: &str = "general";

/// Questions for a matched condition, one per knowledge-base text.
///
/// Ids are `<condition key>_q<index>` counting from zero. Each question
/// also carries the condition key itself.
#[must_use]
pub fn condition_questions(
    category: &str,
    condition: &Condition,
    probability: f64,
) -> Vec<Question> {
    let priority = if probability > 0.7 {
        Priority::High
    } else {
        Priority::Medium
    };

    condition
        .questions
        .iter()
        .enumerate()
        .map(|(index, text)| {
            Question::yes_no(
                format!("{}_q{index}", condition.key),
                *text,
                category,
                priority,
            )
            .with_condition_key(condition.key.clone())
        })
        .collect()
}

/// The two questions asked when no condition matched.
#[must_use]
pub fn generic_questions() -> Vec<Question> {
    vec![
        Question::yes_no(
            "general_1",
            "Você está com febre?",
            GENERAL_CATEGORY,
            Priority::Medium,
        ),
        Question::multiple_choice(
            "general_2",
            "Os sintomas começaram há quanto tempo?",
            ["Menos de 1 hora", "1-6 horas", "6-24 horas", "Mais de 24 horas"]
                .into_iter()
                .map(String::from)
                .collect(),
            GENERAL_CATEGORY,
            Priority::High,
        ),
    ]
}
