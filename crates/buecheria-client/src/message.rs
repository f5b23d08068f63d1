//! Turning a failed response into a human-readable message.
//!
//! The API reports errors as `{"detail": ...}`, but proxies and crashed
//! workers return HTML or plain text, and some failures have no body at
//! all. The message is picked from the first tier that applies:
//!
//! 1. JSON body with a non-empty `detail` → the detail
//! 2. non-empty, non-JSON body → the raw text
//! 3. anything else → `"<context>: <code> <reason>"`

use reqwest::{Response, StatusCode};
use serde_json::Value;

/// Consumes `response` and returns its error message.
///
/// `context` names the failed operation (`"Login failed"`,
/// `"Failed to fetch books"`) and only shows up in the last tier.
pub(crate) async fn error_message(response: Response, context: &str) -> String {
    let status = response.status();
    let body = match response.bytes().await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::debug!(error = %e, %status, "failed to read error body");
            None
        }
    };
    message_from_body(status, body.as_deref(), context)
}

/// The pure part of [`error_message`], split out so the tiers can be
/// tested without a server.
pub(crate) fn message_from_body(
    status: StatusCode,
    body: Option<&[u8]>,
    context: &str,
) -> String {
    if let Some(body) = body {
        match serde_json::from_slice::<Value>(body) {
            Ok(json) => {
                if let Some(detail) = detail_of(&json) {
                    return detail;
                }
            }
            Err(_) => {
                let text = String::from_utf8_lossy(body);
                let text = text.trim();
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    status_line(status, context)
}

/// Tier 1. String details are returned verbatim. Structured details
/// (validation error lists) are rendered as compact JSON.
fn detail_of(json: &Value) -> Option<String> {
    match json.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Tier 3.
fn status_line(status: StatusCode, context: &str) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{context}: {} {reason}", status.as_u16()),
        None => format!("{context}: {}", status.as_u16()),
    }
}
