//! Error taxonomy for the selection cascade.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CascadeError {
    /// Required user input was missing; no network call was attempted.
    #[error("{0}")]
    Validation(String),

    /// The transport reported a failure.
    #[error("{0}")]
    Remote(String),

    /// An async result arrived after its request was superseded and was dropped.
    #[error("stale {lane} result discarded (generation {generation}, current {current})")]
    StaleResultDiscarded {
        lane: &'static str,
        generation: u64,
        current: u64,
    },
}

impl CascadeError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a transport message, substituting `fallback` when it is blank.
    pub fn remote(message: impl Into<String>, fallback: &str) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Remote(fallback.to_string())
        } else {
            Self::Remote(message)
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleResultDiscarded { .. })
    }
}
