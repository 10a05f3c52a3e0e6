//! Field path grammar shared by prompt-field discovery and the write path.
//!
//! A path is a dot-separated list of object keys, where any key may be
//! followed by one or more `[n]` array indices:
//!
//! ```text
//! options.systemMessage
//! messages.values[0].content
//! ```
//!
//! Paths are plain strings while they travel through the selection cascade;
//! they are parsed and resolved against live node parameters only when a value
//! is read for preview or written back.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

/// A single traversal step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldPathError {
    #[error("field path is empty")]
    Empty,

    #[error("malformed field path '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("field path '{path}' no longer resolves: '{segment}' is missing")]
    Missing { path: String, segment: String },

    #[error("field path '{path}' no longer resolves: '{segment}' is not {expected}")]
    TypeMismatch {
        path: String,
        segment: String,
        expected: &'static str,
    },
}

/// Parsed field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Resolve the path against `root`, returning the value it points at.
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments.iter().try_fold(root, |current, segment| match segment {
            PathSegment::Key(key) => current.as_object()?.get(key),
            PathSegment::Index(index) => current.as_array()?.get(*index),
        })
    }

    /// Assign `value` at the path inside `root`.
    ///
    /// Every intermediate segment must already exist with the right shape. A
    /// missing final key is inserted; a missing final index is an error since
    /// arrays are never padded.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), FieldPathError> {
        let (last, parents) = self.segments.split_last().ok_or(FieldPathError::Empty)?;

        let mut current = root;
        for segment in parents {
            current = self.step_mut(current, segment)?;
        }

        match last {
            PathSegment::Key(key) => {
                let object = current.as_object_mut().ok_or_else(|| self.type_mismatch(last, "an object"))?;
                object.insert(key.clone(), value);
            }
            PathSegment::Index(index) => {
                let array = current.as_array_mut().ok_or_else(|| self.type_mismatch(last, "an array"))?;
                let slot = array.get_mut(*index).ok_or_else(|| self.missing(last))?;
                *slot = value;
            }
        }
        Ok(())
    }

    fn step_mut<'a>(&self, current: &'a mut Value, segment: &PathSegment) -> Result<&'a mut Value, FieldPathError> {
        match segment {
            PathSegment::Key(key) => current
                .as_object_mut()
                .ok_or_else(|| self.type_mismatch(segment, "an object"))?
                .get_mut(key)
                .ok_or_else(|| self.missing(segment)),
            PathSegment::Index(index) => current
                .as_array_mut()
                .ok_or_else(|| self.type_mismatch(segment, "an array"))?
                .get_mut(*index)
                .ok_or_else(|| self.missing(segment)),
        }
    }

    fn missing(&self, segment: &PathSegment) -> FieldPathError {
        FieldPathError::Missing {
            path: self.raw.clone(),
            segment: segment.to_string(),
        }
    }

    fn type_mismatch(&self, segment: &PathSegment, expected: &'static str) -> FieldPathError {
        FieldPathError::TypeMismatch {
            path: self.raw.clone(),
            segment: segment.to_string(),
            expected,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().is_empty() {
            return Err(FieldPathError::Empty);
        }
        let malformed = |reason: &str| FieldPathError::Malformed {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        for part in raw.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(open) => part.split_at(open),
                None => (part, ""),
            };
            if key.is_empty() {
                return Err(malformed("empty key"));
            }
            segments.push(PathSegment::Key(key.to_string()));

            while !rest.is_empty() {
                let Some(inner) = rest.strip_prefix('[') else {
                    return Err(malformed("unexpected text after index"));
                };
                let close = inner.find(']').ok_or_else(|| malformed("unclosed index"))?;
                let index = inner[..close]
                    .parse::<usize>()
                    .map_err(|_| malformed("index must be a non-negative integer"))?;
                segments.push(PathSegment::Index(index));
                rest = &inner[close + 1..];
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }
}
