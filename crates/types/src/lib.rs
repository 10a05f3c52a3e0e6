//! Shared type definitions for the Promptline workspace.
//!
//! These types describe the remote instance as seen by the selection cascade:
//! the credentials used to reach it, the workflows and nodes it exposes, and
//! the per-lane asynchronous status reported back to the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod workflow;

pub use workflow::{Node, NodeList, Workflow, WorkflowDetail, WorkflowPage};

/// Instance URL and API key used for every remote call.
///
/// The key is omitted from the `Debug` representation so credentials can be
/// logged through `tracing` fields without leaking secrets.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Base URL of the remote instance (for example `https://n8n.example.com`).
    pub url: String,
    /// API key sent with each request.
    pub api_key: String,
}

impl Credentials {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Returns true when both the URL and the API key are non-blank.
    pub fn is_complete(&self) -> bool {
        !self.url.trim().is_empty() && !self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("api_key", &api_key)
            .finish()
    }
}

/// Status of one asynchronous action lane (connect or submit).
///
/// `Error` and `Success` are mutually exclusive by construction: a lane only
/// ever carries a single current message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum AsyncStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
    Success(String),
}

impl AsyncStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Current error message, if the lane last failed.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Current success message, if the lane last succeeded.
    pub fn success(&self) -> Option<&str> {
        match self {
            Self::Success(message) => Some(message),
            _ => None,
        }
    }
}
