use crate::error::RelayError;
use serde_json::Value;

/// Extract the first choice's text from a non-streaming response.
///
/// Missing choices, a missing message and blank content all count as "no answer".
pub fn extract_content(response_json: &Value) -> Option<String> {
    response_json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .filter(|content| !content.trim().is_empty())
        .map(|s| s.to_string())
}

pub fn extract_usage(response_json: &Value) -> Option<Value> {
    response_json
        .get("usage")
        .filter(|usage| usage.is_object())
        .cloned()
}

/// The provider's own description of a failure, if its body carries one.
pub fn extract_error_message(response_json: &Value) -> Option<String> {
    let error = response_json.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(|s| s.to_string())
}

/// Classify a non-success HTTP status from the provider.
pub fn classify_error_status(status: u16, body: &str) -> RelayError {
    match status {
        401 | 403 => RelayError::Auth { status },
        429 => RelayError::RateLimited,
        _ => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|json| extract_error_message(&json))
                .unwrap_or_else(|| format!("HTTP status {}", status));
            RelayError::Provider {
                status: Some(status),
                message,
            }
        }
    }
}
