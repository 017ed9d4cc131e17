//! Question records and the question-source payload format
//!
//! Accepted bodies: `{"questions": [...]}`, `{"question": [...]}` or
//! `{"error": "..."}`. Each entry is
//! `{"question": text, "options": [4 × text], "correct_answer": 0..=3}`.

use butterfly_core::{ButterflyError, Result};
use serde::{Deserialize, Serialize};

/// Every question offers exactly this many answers
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer: usize,
}

impl Question {
    pub fn new(prompt: &str, options: [&str; OPTION_COUNT], correct_answer: usize) -> Self {
        Self {
            prompt: prompt.to_string(),
            options: options.map(str::to_string),
            correct_answer: correct_answer.min(OPTION_COUNT - 1),
        }
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_answer
    }
}

/// Parse a raw response body
pub fn parse_question_payload(body: &str) -> Result<Vec<Question>> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ButterflyError::QuestionsUnavailable(format!("malformed payload: {}", e)))?;
    parse_question_value(&value)
}

/// Parse an already-decoded JSON body
pub fn parse_question_value(value: &serde_json::Value) -> Result<Vec<Question>> {
    if let Some(message) = value.get("error").filter(|v| is_truthy(v)) {
        let message = message
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| message.to_string());
        return Err(ButterflyError::QuestionsUnavailable(message));
    }

    let entries = value
        .get("questions")
        .or_else(|| value.get("question"))
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            ButterflyError::QuestionsUnavailable(
                "malformed payload: expected a `questions` array".to_string(),
            )
        })?;

    if entries.is_empty() {
        return Err(ButterflyError::QuestionsUnavailable(
            "no questions for this topic".to_string(),
        ));
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| parse_entry(i, entry))
        .collect()
}

/// `null`, `false`, `0` and `""` mean no error
fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

fn parse_entry(index: usize, entry: &serde_json::Value) -> Result<Question> {
    let malformed =
        |what: &str| ButterflyError::QuestionsUnavailable(format!("question {}: {}", index, what));

    let prompt = entry
        .get("question")
        .and_then(|v| v.as_str())
        .ok_or_else(|| malformed("missing `question` text"))?;

    let options: Vec<String> = entry
        .get("options")
        .and_then(|v| v.as_array())
        .ok_or_else(|| malformed("missing `options`"))?
        .iter()
        .map(|o| o.as_str().map(str::to_string))
        .collect::<Option<_>>()
        .ok_or_else(|| malformed("options must be text"))?;

    let options: [String; OPTION_COUNT] = options
        .try_into()
        .map_err(|v: Vec<String>| malformed(&format!("expected 4 options, got {}", v.len())))?;

    let correct_answer = entry
        .get("correct_answer")
        .and_then(|v| v.as_u64())
        .ok_or_else(|| malformed("missing `correct_answer`"))? as usize;
    if correct_answer >= OPTION_COUNT {
        return Err(malformed(&format!(
            "correct_answer {} out of range",
            correct_answer
        )));
    }

    Ok(Question {
        prompt: prompt.to_string(),
        options,
        correct_answer,
    })
}
