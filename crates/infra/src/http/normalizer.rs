//! Non-2xx responses to [`StatusError`]
//!
//! The API answers failures in one of two JSON shapes: a flat
//! `{"message": .., "result": ..}` object or the Google style
//! `{"error": {"code": .., "message": .., "status": ..}}` wrapper. Flat
//! fields win when both are present. Anything else falls back to the raw
//! body text and the canonical reason phrase.

use feedlink_domain::StatusError;
use reqwest::StatusCode;
use serde::Deserialize;

/// Longest raw body kept as a message when the body is not JSON
const MAX_RAW_MESSAGE_LEN: usize = 512;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
    result: Option<String>,
    error: Option<NestedError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NestedError {
    message: Option<String>,
    status: Option<String>,
}

/// Build the domain error for a failed response.
pub fn normalize_error(status: StatusCode, body: &[u8]) -> StatusError {
    let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let nested = parsed.error.unwrap_or_default();

    let message = non_empty(parsed.message)
        .or_else(|| non_empty(nested.message))
        .unwrap_or_else(|| raw_message(body));

    let result = non_empty(parsed.result)
        .or_else(|| non_empty(nested.status))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown Status").to_string());

    StatusError::new(status.as_u16(), message, result)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn raw_message(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(MAX_RAW_MESSAGE_LEN) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
