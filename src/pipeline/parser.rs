use serde_json::Value;

use super::AiError;

/// Locate the JSON object in the model's text.
///
/// Accepts a bare object, a ```json fenced block, or prose around an object
/// (first `{` to last `}`). Anything else is unusable output.
pub fn extract_json_object(text: &str) -> Result<Value, AiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AiError::EmptyModelOutput("Model returned empty text".into()));
    }

    let candidate = fenced_block(trimmed)
        .or_else(|| braced_span(trimmed))
        .ok_or_else(|| AiError::EmptyModelOutput("No JSON object in model output".into()))?;

    match serde_json::from_str::<Value>(candidate) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(AiError::EmptyModelOutput(
            "Model output was JSON but not an object".into(),
        )),
        Err(e) => Err(AiError::EmptyModelOutput(format!(
            "Model output is not valid JSON: {e}"
        ))),
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json")? + 7;
    let end = text[start..].find("```")?;
    Some(text[start..start + end].trim())
}

fn braced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
