//! Symptom matching and probability scoring.

use crate::knowledge::Condition;
use crate::model::Urgency;

/// Upper bound of a locally computed probability.
pub const MAX_PROBABILITY: f64 = 0.95;

/// Conditions at or below this probability are discarded.
pub const MIN_PROBABILITY: f64 = 0.3;

/// Added for each intensity modifier present in the symptom text.
pub const MODIFIER_BONUS: f64 = 0.1;

/// Conditions that are urgent regardless of probability.
///
/// Matched by exact display name.
pub const URGENT_CONDITIONS: &[&str] = &[
    "Infarto Agudo do Miocárdio",
    "Ataque Isquêmico Transitório",
];

/// Bonus for intensity modifiers in the (lowercase) symptom text.
///
/// One [`MODIFIER_BONUS`] each for: "intenso" or "forte", "constante",
/// and "piora".
#[must_use]
pub fn modifier_bonus(text: &str) -> f64 {
    let mut bonus = 0.0;
    if text.contains("intenso") || text.contains("forte") {
        bonus += MODIFIER_BONUS;
    }
    if text.contains("constante") {
        bonus += MODIFIER_BONUS;
    }
    if text.contains("piora") {
        bonus += MODIFIER_BONUS;
    }
    bonus
}

/// Probability of `condition` given `matched` keywords and the symptom text.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score(condition: &Condition, matched: usize, text: &str) -> f64 {
    let ratio = matched as f64 / condition.symptoms.len() as f64;
    (condition.base_probability * ratio + modifier_bonus(text)).min(MAX_PROBABILITY)
}

/// Urgency for a condition name at the given probability.
#[must_use]
pub fn urgency(name: &str, probability: f64) -> Urgency {
    let urgent_class = URGENT_CONDITIONS.contains(&name);
    if urgent_class && probability > 0.7 {
        Urgency::Immediate
    } else if urgent_class || probability > 0.8 {
        Urgency::Urgent
    } else if probability > 0.6 {
        Urgency::Moderate
    } else {
        Urgency::Low
    }
}
