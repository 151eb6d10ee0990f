//! Pulling a JSON object out of free-form model text.
//!
//! Models asked for "only JSON" still wrap it in Markdown fences or add a
//! sentence before it often enough that the raw text cannot be handed to
//! `serde_json` directly.

use serde_json::Value;

use crate::error::BedrockError;

/// Parse the JSON object contained in `text`.
///
/// Tries, in order: the whole trimmed text, the body of a fenced code
/// block, and the span from the first `{` to the last `}`.
pub fn extract_json_object(text: &str) -> Result<Value, BedrockError> {
    let trimmed = text.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(value);
    }

    if let Some(body) = fenced_body(trimmed) {
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(body) {
            return Ok(value);
        }
    }

    let start = trimmed.find('{');
    let end = trimmed.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => {
            match serde_json::from_str::<Value>(&trimmed[start..=end]) {
                Ok(value @ Value::Object(_)) => Ok(value),
                Ok(_) => Err(BedrockError::ResponseParse(
                    "response JSON is not an object".to_string(),
                )),
                Err(e) => Err(BedrockError::ResponseParse(format!(
                    "invalid JSON in response: {e}. Response: {}",
                    preview(trimmed)
                ))),
            }
        }
        _ => Err(BedrockError::ResponseParse(format!(
            "no JSON object in response: {}",
            preview(trimmed)
        ))),
    }
}

fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    // Skip an info string such as `json`.
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

fn preview(text: &str) -> String {
    const MAX: usize = 200;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
