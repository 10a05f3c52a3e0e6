//! # Text Processing Utilities
//!
//! Secret redaction for anything that may end up in logs, plus the small
//! truncation helpers used when rendering field previews.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Redacts values that look like secrets in a string.
///
/// Header lines such as `X-N8N-API-KEY: ...` or `Authorization: Bearer ...`
/// and `KEY=value` style assignments keep their name while the value is
/// replaced with `[REDACTED]`.
///
/// # Example
/// ```rust
/// use promptline_util::redact_sensitive;
///
/// let redacted = redact_sensitive("X-N8N-API-KEY: abc123");
/// assert_eq!(redacted, "X-N8N-API-KEY: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    redact_sensitive_with(input, "[REDACTED]")
}

/// Redacts sensitive-looking values, using a custom replacement token.
pub fn redact_sensitive_with(input: &str, replacement: &str) -> String {
    let mut redacted = input.to_string();

    for pattern in get_redact_patterns().iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}{}", prefix, replacement)
            })
            .to_string();
    }

    redacted
}

/// Returns compiled regex patterns for detecting sensitive information.
///
/// Each pattern captures the part to keep in group 1; the remainder of the
/// match is replaced.
fn get_redact_patterns() -> &'static Vec<Regex> {
    static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(build_redact_patterns);

    &REDACT_PATTERNS
}

fn build_redact_patterns() -> Vec<Regex> {
    [
        r"(?i)(x-n8n-api-key:\s*)([^\s,]+)",
        r"(?i)(authorization:\s*)((bearer|basic)\s+)?([^\s,]+)",
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD)=)([^\s&]+)",
        r#"(?i)("(api_?key|token|secret|password)"\s*:\s*)("[^"]*")"#,
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}

/// Trims `text` and shortens it to at most `max_len` characters, ending with
/// `...` when truncated.
pub fn truncate_for_summary(text: &str, max_len: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }

    // Reserve space for the trailing ellipsis ("...").
    let target_len = max_len.saturating_sub(3);
    let truncated: String = trimmed.chars().take(target_len).collect();
    format!("{}...", truncated.trim_end())
}

/// Single-line preview of a JSON value for list rendering.
///
/// Strings are shown without quotes, composite values as compact JSON. Line
/// breaks are flattened so previews never span multiple rows.
pub fn preview_value(value: &Value, max_len: usize) -> String {
    let raw = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    let flattened = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_for_summary(&flattened, max_len)
}
