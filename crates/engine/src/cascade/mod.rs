//! Selection cascade: workflow → node → field.
//!
//! Modules:
//! - `state`: cascade state, messages, effects, and the pure reducer
//! - `submission`: submit preconditions and completion messages

mod state;
mod submission;

pub use state::{CascadeState, Effect, Msg, SelectionState};
pub use submission::{FieldWrite, success_message};
