//! Lenient parsing of model output into [`Analysis`] values.
//!
//! Model output is free text that usually, but not always, is a single JSON
//! object. [`extract_json`] finds the object; [`parse_analysis`] and
//! [`merge_refinement`] turn it into an [`Analysis`], filling gaps from the
//! engine or from the prior analysis.

use serde_json::{Map, Value};

use crate::engine;
use crate::error::AssistError;
use crate::model::{
    Analysis, Confidence, Diagnosis, Priority, Question, QuestionType, RiskLevel, Urgency,
};

const PREVIEW_LEN: usize = 100;

/// Extract a JSON value from model output.
///
/// Tried in order: the raw text, a ```` ```json ```` fenced block, a plain
/// ```` ``` ```` fenced block, then the first balanced `{...}` object.
///
/// # Errors
///
/// Returns [`AssistError::JsonParseFailed`] if no candidate parses.
///
/// # Example
///
/// ```
/// use triage_assist::assistant::extract_json;
///
/// let json = extract_json("Segue a análise: {\"riskLevel\": \"high\"} Fim.").unwrap();
/// assert_eq!(json["riskLevel"], "high");
///
/// assert!(extract_json("sem json").is_err());
/// ```
pub fn extract_json(text: &str) -> Result<Value, AssistError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(json_str) = extract_from_code_block(trimmed, "```json") {
        return parse_json_with_context(json_str, text);
    }

    if let Some(json_str) = extract_from_code_block(trimmed, "```") {
        return parse_json_with_context(json_str, text);
    }

    if let Some(json_str) = extract_balanced_object(trimmed) {
        return parse_json_with_context(json_str, text);
    }

    Err(AssistError::JsonParseFailed {
        message: format!("No valid JSON found in response: {}", preview(text)),
    })
}

fn extract_from_code_block<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let start_idx = text.find(prefix)?;
    let remaining = text[start_idx + prefix.len()..].trim_start();
    let end_idx = remaining.find("```")?;
    let json_str = remaining[..end_idx].trim();

    if json_str.is_empty() {
        None
    } else {
        Some(json_str)
    }
}

/// First `{...}` span with balanced braces, ignoring braces inside strings.
fn extract_balanced_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0_usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=start + i]);
                }
            }
            _ => {}
        }
    }

    None
}

fn parse_json_with_context(json_str: &str, original: &str) -> Result<Value, AssistError> {
    serde_json::from_str(json_str).map_err(|e| AssistError::JsonParseFailed {
        message: format!("Failed to parse JSON: {e}. Preview: {}", preview(original)),
    })
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Build an [`Analysis`] from a parsed model response.
///
/// Missing arrays become empty, a missing or unknown `riskLevel` becomes
/// low, and a missing `initialAssessment` is written from the parsed
/// conditions. Conditions are sorted by probability.
///
/// # Errors
///
/// Returns an error if the value is not an object or a condition lacks its
/// name or probability.
pub fn parse_analysis(value: &Value, symptoms: &str) -> Result<Analysis, AssistError> {
    let obj = as_object(value, "analysis")?;

    let possible_conditions = parse_conditions(obj)?.unwrap_or_default();
    let generated_questions = parse_questions(obj)?.unwrap_or_default();
    let risk_level = obj
        .get("riskLevel")
        .and_then(Value::as_str)
        .and_then(RiskLevel::parse)
        .unwrap_or_default();
    let recommendations = string_array(obj.get("recommendations")).unwrap_or_default();

    let mut analysis = Analysis {
        initial_assessment: String::new(),
        possible_conditions,
        generated_questions,
        risk_level,
        recommendations,
    };
    analysis.sort_conditions();
    analysis.initial_assessment = obj
        .get("initialAssessment")
        .and_then(Value::as_str)
        .map_or_else(
            || engine::initial_assessment(symptoms, &analysis.possible_conditions),
            str::to_string,
        );
    Ok(analysis)
}

/// Build a refined [`Analysis`], taking each missing field from `prior`.
///
/// # Errors
///
/// Returns an error if the value is not an object or a present condition
/// or question is malformed.
pub fn merge_refinement(value: &Value, prior: &Analysis) -> Result<Analysis, AssistError> {
    let obj = as_object(value, "analysis")?;

    let mut analysis = Analysis {
        initial_assessment: obj
            .get("initialAssessment")
            .and_then(Value::as_str)
            .map_or_else(|| prior.initial_assessment.clone(), str::to_string),
        possible_conditions: parse_conditions(obj)?
            .unwrap_or_else(|| prior.possible_conditions.clone()),
        generated_questions: parse_questions(obj)?
            .unwrap_or_else(|| prior.generated_questions.clone()),
        risk_level: obj
            .get("riskLevel")
            .and_then(Value::as_str)
            .and_then(RiskLevel::parse)
            .unwrap_or(prior.risk_level),
        recommendations: string_array(obj.get("recommendations"))
            .unwrap_or_else(|| prior.recommendations.clone()),
    };
    analysis.sort_conditions();
    Ok(analysis)
}

fn as_object<'a>(value: &'a Value, field: &str) -> Result<&'a Map<String, Value>, AssistError> {
    value.as_object().ok_or_else(|| AssistError::InvalidValue {
        field: field.to_string(),
        reason: "expected a JSON object".to_string(),
    })
}

fn parse_conditions(obj: &Map<String, Value>) -> Result<Option<Vec<Diagnosis>>, AssistError> {
    match obj.get("possibleConditions") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(parse_diagnosis)
            .collect::<Result<_, _>>()
            .map(Some),
        Some(_) => Err(AssistError::InvalidValue {
            field: "possibleConditions".to_string(),
            reason: "expected an array".to_string(),
        }),
    }
}

fn parse_questions(obj: &Map<String, Value>) -> Result<Option<Vec<Question>>, AssistError> {
    match obj.get("generatedQuestions") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(parse_question)
            .collect::<Result<_, _>>()
            .map(Some),
        Some(_) => Err(AssistError::InvalidValue {
            field: "generatedQuestions".to_string(),
            reason: "expected an array".to_string(),
        }),
    }
}

/// Parse one condition; confidence and urgency are derived when absent.
fn parse_diagnosis(value: &Value) -> Result<Diagnosis, AssistError> {
    let obj = as_object(value, "possibleConditions")?;

    let condition = required_str(obj, "condition")?;
    let probability = obj
        .get("probability")
        .and_then(Value::as_f64)
        .ok_or_else(|| missing("probability"))?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(AssistError::InvalidValue {
            field: "probability".to_string(),
            reason: format!("{probability} is outside 0-1"),
        });
    }

    let confidence = obj
        .get("confidence")
        .and_then(Value::as_str)
        .and_then(Confidence::parse)
        .unwrap_or_else(|| Confidence::from_probability(probability));
    let urgency = obj
        .get("urgency")
        .and_then(Value::as_str)
        .and_then(Urgency::parse)
        .unwrap_or_else(|| engine::urgency(&condition, probability));

    Ok(Diagnosis {
        condition_key: crate::model::condition_key(&condition),
        condition,
        probability,
        confidence,
        symptoms: string_array(obj.get("symptoms")).unwrap_or_default(),
        recommendations: string_array(obj.get("recommendations")).unwrap_or_default(),
        urgency,
        next_steps: string_array(obj.get("nextSteps")).unwrap_or_default(),
    })
}

fn parse_question(value: &Value) -> Result<Question, AssistError> {
    let obj = as_object(value, "generatedQuestions")?;

    Ok(Question {
        id: required_str(obj, "id")?,
        text: required_str(obj, "text")?,
        question_type: obj
            .get("type")
            .and_then(Value::as_str)
            .and_then(QuestionType::parse)
            .unwrap_or(QuestionType::YesNo),
        options: string_array(obj.get("options")),
        category: obj
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or(engine::GENERAL_CATEGORY)
            .to_string(),
        condition_key: obj
            .get("conditionKey")
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
            .map(str::to_string),
        priority: obj
            .get("priority")
            .and_then(Value::as_str)
            .and_then(Priority::parse)
            .unwrap_or(Priority::Medium),
    })
}

fn required_str(obj: &Map<String, Value>, field: &str) -> Result<String, AssistError> {
    obj.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .ok_or_else(|| missing(field))
}

fn missing(field: &str) -> AssistError {
    AssistError::MissingField {
        field: field.to_string(),
    }
}

/// String items of an array; non-string items are skipped.
fn string_array(value: Option<&Value>) -> Option<Vec<String>> {
    value.and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    })
}
