//! Answer-driven refinement.

use crate::model::{Analysis, Answer};

/// Added to a diagnosis for each affirmative linked answer.
pub const AFFIRMATIVE_ADJUSTMENT: f64 = 0.1;

/// Subtracted from a diagnosis for each negative linked answer.
pub const NEGATIVE_ADJUSTMENT: f64 = 0.05;

/// Adjust diagnosis probabilities from the answers to `prior`'s questions.
///
/// An answer affects a diagnosis only when its question is found among the
/// prior's generated questions and that question's category equals the
/// diagnosis condition key. Answers with other values, and answers to
/// unknown question ids, are ignored.
///
/// Only the diagnoses change. Risk level, assessment text, questions and
/// general recommendations are carried over as they were.
#[must_use]
pub fn refine(answers: &[Answer], prior: &Analysis) -> Analysis {
    let mut refined = prior.clone();

    for diagnosis in &mut refined.possible_conditions {
        let key = diagnosis.key();
        let mut probability = diagnosis.probability;

        for answer in answers {
            let Some(question) = prior.question(&answer.question_id) else {
                continue;
            };
            if question.category != key {
                continue;
            }
            if answer.value.is_affirmative() {
                probability += AFFIRMATIVE_ADJUSTMENT;
            } else if answer.value.is_negative() {
                probability -= NEGATIVE_ADJUSTMENT;
            }
        }

        diagnosis.set_probability(probability);
    }

    refined.sort_conditions();

    tracing::debug!(
        answers = answers.len(),
        conditions = refined.possible_conditions.len(),
        "Refined analysis"
    );

    refined
}
