//! # Promptline Engine
//!
//! The Promptline Engine drives the workflow → node → field selection cascade
//! against a remote workflow-automation instance and pushes edited prompt text
//! back into a node's configuration.
//!
//! ## Key Features
//!
//! - **Selection Cascade**: Dependent selections where changing a level clears every level below it
//! - **Stale-Result Protection**: Generation counters per async lane drop superseded completions
//! - **Prompt Field Discovery**: Depth-bounded search for prompt-like keys in untyped node parameters
//! - **Submission**: Read-modify-write of a single field with precondition checks and per-lane status
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use promptline_engine::{CascadeController, HttpTransport};
//! use promptline_types::Credentials;
//!
//! async fn run() -> Result<(), promptline_engine::CascadeError> {
//!     let mut controller = CascadeController::new(Arc::new(HttpTransport));
//!     controller.connect(Credentials::new("http://localhost:5678", "key"))?;
//!     controller.settle().await?;
//!     for workflow in controller.state().workflows() {
//!         println!("{} {}", workflow.id, workflow.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`cascade`**: Pure state, messages, effects, and the reducer
//! - **`field_paths`**: Prompt field discovery and previews
//! - **`transport`**: The remote-call seam and its HTTP implementation
//! - **`controller`**: Runs effects on background tasks and feeds completions back
//! - **`error`**: Validation, remote, and staleness errors

pub mod cascade;
pub mod controller;
pub mod error;
pub mod field_paths;
pub mod transport;

pub use cascade::{CascadeState, Effect, FieldWrite, Msg, SelectionState, success_message};
pub use controller::{CascadeController, run_effect};
pub use error::CascadeError;
pub use field_paths::{
    DEFAULT_MAX_DEPTH, DiscoveryOptions, FieldCandidate, PROMPT_KEY_VOCABULARY, describe_candidates, discover_prompt_fields,
    discover_prompt_fields_with,
};
pub use transport::{HttpTransport, WorkflowTransport, apply_field_write};
