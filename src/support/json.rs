//! Defensive JSON parsing for untrusted response bodies

use serde_json::Value;
use tracing::debug;

/// Parse `text` as JSON
pub fn parse_json(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text)
}

/// Parse `text` as JSON, returning `None` instead of an error on malformed input
#[must_use]
pub fn parse_json_safe(text: &str) -> Option<Value> {
    match parse_json(text) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Discarding malformed JSON ({} bytes): {}", text.len(), e);
            None
        }
    }
}
