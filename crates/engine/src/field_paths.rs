//! Prompt field discovery over untyped node parameters.
//!
//! Node configuration has no fixed schema, so candidates are proposed by a
//! depth-bounded walk that matches key names against a vocabulary of
//! prompt-like words. Results are plain path strings in the grammar of
//! [`FieldPath`], deduplicated and sorted so listings are reproducible.

use std::collections::BTreeSet;

use promptline_util::{FieldPath, preview_value};
use serde_json::{Map as JsonMap, Value};
use tracing::debug;

/// Key fragments that mark a field as a likely prompt. Matched
/// case-insensitively as substrings of the key.
pub const PROMPT_KEY_VOCABULARY: &[&str] = &[
    "prompt",
    "systemMessage",
    "systemPrompt",
    "instruction",
    "instructions",
    "message",
    "messages",
    "content",
    "text",
    "input",
    "query",
    "system",
    "assistant",
    "user",
    "context",
];

/// Default number of nested object levels inspected below the root.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Tuning knobs for [`discover_prompt_fields_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Deepest object level whose keys are inspected; the root is level 0.
    pub max_depth: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Discover candidate prompt field paths with the default depth bound.
pub fn discover_prompt_fields(root: &Value) -> Vec<String> {
    discover_prompt_fields_with(root, &DiscoveryOptions::default())
}

/// Discover candidate prompt field paths.
///
/// A non-object root yields no candidates. The result is deduplicated and in
/// ascending lexicographic order regardless of key iteration order.
pub fn discover_prompt_fields_with(root: &Value, options: &DiscoveryOptions) -> Vec<String> {
    let Value::Object(map) = root else {
        return Vec::new();
    };
    let mut candidates = BTreeSet::new();
    collect_prompt_fields(map, "", 0, options.max_depth, &mut candidates);
    candidates.into_iter().collect()
}

fn collect_prompt_fields(map: &JsonMap<String, Value>, current_path: &str, depth: usize, max_depth: usize, out: &mut BTreeSet<String>) {
    if depth > max_depth {
        return;
    }

    for (key, value) in map {
        // The path grammar has no escapes, so such keys could not be written back.
        if !is_addressable_key(key) {
            debug!(key = %key, path = %current_path, "skipping key that cannot be expressed as a field path");
            continue;
        }
        let next_path = if current_path.is_empty() {
            key.to_string()
        } else {
            format!("{current_path}.{key}")
        };

        if key_matches_vocabulary(key) && is_prompt_container(value) {
            out.insert(next_path.clone());
        }
        if depth == 0 && value.as_str().is_some_and(|text| !text.is_empty()) {
            out.insert(next_path.clone());
        }

        match value {
            Value::Object(nested) => collect_prompt_fields(nested, &next_path, depth + 1, max_depth, out),
            // Array items are assumed homogeneous; only the first one is sampled.
            Value::Array(items) => {
                if let Some(Value::Object(first)) = items.first() {
                    collect_prompt_fields(first, &format!("{next_path}[0]"), depth + 1, max_depth, out);
                }
            }
            _ => {}
        }
    }
}

/// Keys containing path separators or index brackets are not addressable.
fn is_addressable_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(['.', '[', ']'])
}

/// Returns true when the key contains any vocabulary term, ignoring case.
pub fn key_matches_vocabulary(key: &str) -> bool {
    let lowered = key.to_lowercase();
    PROMPT_KEY_VOCABULARY
        .iter()
        .any(|term| lowered.contains(&term.to_lowercase()))
}

/// Strings and non-null composites can hold prompt text. Arrays count as
/// composites here, so a vocabulary-named list is itself a candidate.
fn is_prompt_container(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Object(_) | Value::Array(_))
}

/// A discovered field paired with a preview of its current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCandidate {
    pub path: String,
    /// Single-line preview, or `None` when the path no longer resolves.
    pub preview: Option<String>,
}

/// Attach current-value previews to discovered paths.
pub fn describe_candidates(parameters: &Value, paths: &[String], max_preview_len: usize) -> Vec<FieldCandidate> {
    paths
        .iter()
        .map(|path| {
            let preview = path
                .parse::<FieldPath>()
                .ok()
                .and_then(|parsed| parsed.get(parameters).map(|value| preview_value(value, max_preview_len)));
            FieldCandidate {
                path: path.clone(),
                preview,
            }
        })
        .collect()
}
