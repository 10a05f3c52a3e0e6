//! Imperative shell around [`CascadeState`].
//!
//! The controller applies messages to the cascade state, runs the resulting
//! effects against a [`WorkflowTransport`] on background tasks, and feeds each
//! completion back through a channel. State is only ever touched from the
//! controller's owner, one message at a time; transport calls are the only
//! suspension points.

use std::sync::Arc;

use promptline_types::Credentials;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, warn};

use crate::cascade::{CascadeState, Effect, Msg};
use crate::error::CascadeError;
use crate::transport::WorkflowTransport;

pub struct CascadeController {
    state: CascadeState,
    transport: Arc<dyn WorkflowTransport>,
    completion_tx: UnboundedSender<Msg>,
    completion_rx: UnboundedReceiver<Msg>,
    in_flight: usize,
}

impl CascadeController {
    pub fn new(transport: Arc<dyn WorkflowTransport>) -> Self {
        Self::with_state(transport, CascadeState::new())
    }

    pub fn with_state(transport: Arc<dyn WorkflowTransport>, state: CascadeState) -> Self {
        let (completion_tx, completion_rx) = unbounded_channel();
        Self {
            state,
            transport,
            completion_tx,
            completion_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &CascadeState {
        &self.state
    }

    /// Number of remote calls whose completion has not been applied yet.
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Apply a message and start any remote calls it requests.
    pub fn dispatch(&mut self, msg: Msg) -> Result<(), CascadeError> {
        let effects = self.state.update(msg)?;
        for effect in effects {
            self.spawn_effect(effect);
        }
        Ok(())
    }

    pub fn connect(&mut self, credentials: Credentials) -> Result<(), CascadeError> {
        self.dispatch(Msg::Connect(credentials))
    }

    pub fn update_credentials(&mut self, credentials: Credentials) -> Result<(), CascadeError> {
        self.dispatch(Msg::UpdateCredentials(credentials))
    }

    pub fn select_workflow(&mut self, workflow_id: impl Into<String>) -> Result<(), CascadeError> {
        self.dispatch(Msg::SelectWorkflow(workflow_id.into()))
    }

    pub fn select_node(&mut self, node_id: impl Into<String>) -> Result<(), CascadeError> {
        self.dispatch(Msg::SelectNode(node_id.into()))
    }

    pub fn select_field(&mut self, field_path: impl Into<String>) -> Result<(), CascadeError> {
        self.dispatch(Msg::SelectField(field_path.into()))
    }

    pub fn submit(&mut self, content: impl Into<String>) -> Result<(), CascadeError> {
        self.dispatch(Msg::Submit(content.into()))
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `None` when nothing is in flight. Stale completions are applied
    /// (and dropped by the state) like any other and reported as
    /// [`CascadeError::StaleResultDiscarded`].
    pub async fn process_next(&mut self) -> Option<Result<(), CascadeError>> {
        if self.in_flight == 0 {
            return None;
        }
        let msg = self.completion_rx.recv().await?;
        self.in_flight -= 1;

        let outcome = self.dispatch(msg);
        match &outcome {
            Err(error) if error.is_stale() => debug!(%error, "discarded outdated result"),
            Err(error) => warn!(%error, "remote call failed"),
            Ok(()) => {}
        }
        Some(outcome)
    }

    /// Drain every in-flight call. Returns the last non-stale failure, if any;
    /// the same message is also on the relevant lane status.
    pub async fn settle(&mut self) -> Result<(), CascadeError> {
        let mut last_error = None;
        while let Some(outcome) = self.process_next().await {
            if let Err(error) = outcome
                && !error.is_stale()
            {
                last_error = Some(error);
            }
        }
        last_error.map_or(Ok(()), Err)
    }

    fn spawn_effect(&mut self, effect: Effect) {
        let transport = Arc::clone(&self.transport);
        let completion_tx = self.completion_tx.clone();
        self.in_flight += 1;

        // The inner task isolates transport panics so every effect still
        // produces exactly one completion.
        tokio::spawn(async move {
            let fallback = effect.clone();
            let task = tokio::spawn(async move { run_effect(transport.as_ref(), effect).await });
            let msg = match task.await {
                Ok(msg) => msg,
                Err(error) => {
                    warn!(%error, "transport task ended without a result");
                    failed_completion(fallback, format!("Request failed unexpectedly: {error}"))
                }
            };
            if completion_tx.send(msg).is_err() {
                debug!("controller dropped before completion was delivered");
            }
        });
    }
}

/// Execute one effect and translate its outcome into the completion message.
pub async fn run_effect(transport: &dyn WorkflowTransport, effect: Effect) -> Msg {
    match effect {
        Effect::ListWorkflows { generation, credentials } => Msg::WorkflowsLoaded {
            generation,
            result: transport.list_workflows(&credentials).await,
        },
        Effect::FetchWorkflowDetail {
            generation,
            credentials,
            workflow_id,
        } => Msg::WorkflowDetailLoaded {
            generation,
            result: transport.fetch_workflow_detail(&credentials, &workflow_id).await,
        },
        Effect::WriteNodeField {
            generation,
            credentials,
            write,
        } => Msg::SubmitCompleted {
            generation,
            result: transport.write_node_field(&credentials, &write).await,
            node_id: write.node_id,
        },
    }
}

/// Completion reporting `message` as the failure of `effect`.
fn failed_completion(effect: Effect, message: String) -> Msg {
    match effect {
        Effect::ListWorkflows { generation, .. } => Msg::WorkflowsLoaded {
            generation,
            result: Err(message),
        },
        Effect::FetchWorkflowDetail { generation, .. } => Msg::WorkflowDetailLoaded {
            generation,
            result: Err(message),
        },
        Effect::WriteNodeField { generation, write, .. } => Msg::SubmitCompleted {
            generation,
            node_id: write.node_id,
            result: Err(message),
        },
    }
}
