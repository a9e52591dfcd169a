//! Utility helpers shared across runway-tools.

use serde_json::Value;

/// Render JSON with pretty formatting, falling back to a compact string on error.
#[must_use]
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
