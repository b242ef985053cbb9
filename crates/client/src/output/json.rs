//! JSON output formatting.

/// Format a value as compact JSON, the same shape the server returns.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
