//! Cascade state and its pure reducer.
//!
//! [`CascadeState`] owns the four dependent levels (credentials, workflow
//! list, node list, field list) plus the chosen values at each level. Every
//! user action and every async completion is a [`Msg`]; applying one mutates
//! the state and returns the [`Effect`]s (remote calls) the caller must run.
//! Nothing here performs I/O.
//!
//! Consistency rules:
//! - changing a selection clears every level below it before anything else
//! - each async lane carries a generation counter; a completion commits only
//!   if its captured generation is still current

use promptline_types::{AsyncStatus, Credentials, NodeList, Workflow, WorkflowDetail};
use tracing::debug;

use crate::cascade::submission::{FieldWrite, success_message};
use crate::error::CascadeError;
use crate::field_paths::{DiscoveryOptions, discover_prompt_fields_with};

const CONNECT_FALLBACK_ERROR: &str = "Failed to load workflows";
const DETAIL_FALLBACK_ERROR: &str = "Failed to load workflow nodes";
const SUBMIT_FALLBACK_ERROR: &str = "Failed to update node";

/// Current choice at each cascade level. A level is only `Some` when every
/// level above it is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub workflow_id: Option<String>,
    pub node_id: Option<String>,
    pub field_path: Option<String>,
}

/// Messages that drive the cascade: user actions and async completions.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Store credentials, reset everything, and load the workflow list.
    Connect(Credentials),
    /// Replace credentials without reconnecting.
    UpdateCredentials(Credentials),
    /// Choose a workflow; an empty id clears the selection.
    SelectWorkflow(String),
    /// Choose a node of the selected workflow; an empty id clears it.
    SelectNode(String),
    /// Choose one of the discovered fields; an empty path clears it.
    SelectField(String),
    /// Write prompt content into the selected field.
    Submit(String),
    /// The workflow listing finished.
    WorkflowsLoaded {
        generation: u64,
        result: Result<Vec<Workflow>, String>,
    },
    /// A workflow detail fetch finished.
    WorkflowDetailLoaded {
        generation: u64,
        result: Result<WorkflowDetail, String>,
    },
    /// A field write finished.
    SubmitCompleted {
        generation: u64,
        node_id: String,
        result: Result<(), String>,
    },
}

/// Remote calls requested by the reducer. Each carries the credentials in
/// effect when it was issued and the generation its completion must echo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ListWorkflows {
        generation: u64,
        credentials: Credentials,
    },
    FetchWorkflowDetail {
        generation: u64,
        credentials: Credentials,
        workflow_id: String,
    },
    WriteNodeField {
        generation: u64,
        credentials: Credentials,
        write: FieldWrite,
    },
}

#[derive(Debug, Clone, Default)]
pub struct CascadeState {
    credentials: Credentials,
    workflows: Vec<Workflow>,
    nodes: NodeList,
    fields: Vec<String>,
    selection: SelectionState,
    connect_status: AsyncStatus,
    submit_status: AsyncStatus,
    nodes_loading: bool,
    connect_generation: u64,
    detail_generation: u64,
    submit_generation: u64,
    discovery: DiscoveryOptions,
}

impl CascadeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom discovery depth bound for field lists.
    pub fn with_discovery(mut self, discovery: DiscoveryOptions) -> Self {
        self.discovery = discovery;
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn workflows(&self) -> &[Workflow] {
        &self.workflows
    }

    pub fn nodes(&self) -> &NodeList {
        &self.nodes
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn connect_status(&self) -> &AsyncStatus {
        &self.connect_status
    }

    pub fn submit_status(&self) -> &AsyncStatus {
        &self.submit_status
    }

    /// True while the detail fetch for the selected workflow is outstanding.
    pub fn nodes_loading(&self) -> bool {
        self.nodes_loading
    }

    /// Apply one message, returning the effects the caller must execute.
    ///
    /// Validation failures and stale completions come back as errors; the
    /// state already reflects them (lane status updated or result dropped).
    pub fn update(&mut self, msg: Msg) -> Result<Vec<Effect>, CascadeError> {
        match msg {
            Msg::Connect(credentials) => self.apply_connect(credentials),
            Msg::UpdateCredentials(credentials) => self.apply_credentials_updated(credentials),
            Msg::SelectWorkflow(workflow_id) => Ok(self.apply_workflow_selected(&workflow_id)),
            Msg::SelectNode(node_id) => self.apply_node_selected(&node_id).map(|_| Vec::new()),
            Msg::SelectField(field_path) => self.apply_field_selected(&field_path).map(|_| Vec::new()),
            Msg::Submit(content) => self.apply_submit(&content),
            Msg::WorkflowsLoaded { generation, result } => self.apply_workflows_loaded(generation, result).map(|_| Vec::new()),
            Msg::WorkflowDetailLoaded { generation, result } => {
                self.apply_workflow_detail_loaded(generation, result).map(|_| Vec::new())
            }
            Msg::SubmitCompleted {
                generation,
                node_id,
                result,
            } => self.apply_submit_completed(generation, &node_id, result).map(|_| Vec::new()),
        }
    }

    pub fn apply_connect(&mut self, credentials: Credentials) -> Result<Vec<Effect>, CascadeError> {
        if !credentials.is_complete() {
            let error = CascadeError::validation("Instance URL and API key are both required");
            self.connect_status = AsyncStatus::Error(error.to_string());
            return Err(error);
        }

        self.credentials = credentials;
        self.workflows.clear();
        self.reset_workflow_level(None);
        self.connect_generation += 1;
        self.connect_status = AsyncStatus::Loading;
        debug!(generation = self.connect_generation, url = %self.credentials.url, "connect issued");

        Ok(vec![Effect::ListWorkflows {
            generation: self.connect_generation,
            credentials: self.credentials.clone(),
        }])
    }

    pub fn apply_workflows_loaded(&mut self, generation: u64, result: Result<Vec<Workflow>, String>) -> Result<(), CascadeError> {
        self.ensure_current("connect", generation, self.connect_generation)?;

        match result {
            Ok(workflows) => {
                self.connect_status = AsyncStatus::Success(format!("Connected: {} workflow(s) found", workflows.len()));
                self.workflows = workflows;
                Ok(())
            }
            Err(message) => {
                let error = CascadeError::remote(message, CONNECT_FALLBACK_ERROR);
                self.workflows.clear();
                self.connect_status = AsyncStatus::Error(error.to_string());
                Err(error)
            }
        }
    }

    /// Swap credentials in place. Every in-flight listing and detail fetch
    /// becomes stale. A listing that was still loading is reissued, and the
    /// selected workflow (if any) is reloaded with the new credentials.
    pub fn apply_credentials_updated(&mut self, credentials: Credentials) -> Result<Vec<Effect>, CascadeError> {
        if !credentials.is_complete() {
            let error = CascadeError::validation("Instance URL and API key are both required");
            self.connect_status = AsyncStatus::Error(error.to_string());
            return Err(error);
        }

        self.credentials = credentials;
        self.connect_generation += 1;
        let mut effects = Vec::new();
        if self.connect_status.is_loading() {
            debug!(generation = self.connect_generation, "listing reissued after credential change");
            effects.push(Effect::ListWorkflows {
                generation: self.connect_generation,
                credentials: self.credentials.clone(),
            });
        }

        let workflow_id = self.selection.workflow_id.clone();
        self.reset_workflow_level(workflow_id);
        effects.extend(self.issue_detail_fetch());
        Ok(effects)
    }

    pub fn apply_workflow_selected(&mut self, workflow_id: &str) -> Vec<Effect> {
        let workflow_id = (!workflow_id.is_empty()).then(|| workflow_id.to_string());
        self.reset_workflow_level(workflow_id);
        if self.connect_status.error().is_some() {
            self.connect_status = AsyncStatus::Idle;
        }
        self.issue_detail_fetch()
    }

    pub fn apply_workflow_detail_loaded(&mut self, generation: u64, result: Result<WorkflowDetail, String>) -> Result<(), CascadeError> {
        self.ensure_current("workflow detail", generation, self.detail_generation)?;
        self.nodes_loading = false;

        match result {
            Ok(detail) => {
                self.nodes = detail.nodes.into_iter().collect();
                Ok(())
            }
            Err(message) => {
                let error = CascadeError::remote(message, DETAIL_FALLBACK_ERROR);
                self.nodes.clear();
                self.connect_status = AsyncStatus::Error(error.to_string());
                Err(error)
            }
        }
    }

    /// Select a node and derive its field list synchronously.
    ///
    /// An id that is not in the current node list leaves no node selected.
    pub fn apply_node_selected(&mut self, node_id: &str) -> Result<(), CascadeError> {
        self.selection.field_path = None;
        self.fields.clear();
        self.selection.node_id = None;

        if node_id.is_empty() {
            return Ok(());
        }
        let Some(node) = self.nodes.get(node_id) else {
            return Err(CascadeError::validation(format!(
                "Node '{node_id}' is not part of the selected workflow"
            )));
        };

        self.fields = discover_prompt_fields_with(&node.parameters, &self.discovery);
        self.selection.node_id = Some(node_id.to_string());
        debug!(node_id, fields = self.fields.len(), "node selected");
        Ok(())
    }

    /// Select a field. Only members of the current field list are accepted.
    pub fn apply_field_selected(&mut self, field_path: &str) -> Result<(), CascadeError> {
        if field_path.is_empty() {
            self.selection.field_path = None;
            return Ok(());
        }
        if !self.fields.iter().any(|candidate| candidate == field_path) {
            return Err(CascadeError::validation(format!(
                "Field '{field_path}' is not a discovered prompt field of the selected node"
            )));
        }
        self.selection.field_path = Some(field_path.to_string());
        Ok(())
    }

    pub fn apply_submit(&mut self, content: &str) -> Result<Vec<Effect>, CascadeError> {
        let write = match FieldWrite::from_selection(&self.selection, content) {
            Ok(write) => write,
            Err(error) => {
                self.submit_status = AsyncStatus::Error(error.to_string());
                return Err(error);
            }
        };

        self.submit_generation += 1;
        self.submit_status = AsyncStatus::Loading;
        debug!(
            generation = self.submit_generation,
            workflow_id = %write.workflow_id,
            node_id = %write.node_id,
            field_path = %write.field_path,
            "submit issued"
        );

        Ok(vec![Effect::WriteNodeField {
            generation: self.submit_generation,
            credentials: self.credentials.clone(),
            write,
        }])
    }

    /// Record a write outcome. Selections are kept so the same field can be
    /// submitted again.
    pub fn apply_submit_completed(&mut self, generation: u64, node_id: &str, result: Result<(), String>) -> Result<(), CascadeError> {
        self.ensure_current("submit", generation, self.submit_generation)?;

        match result {
            Ok(()) => {
                self.submit_status = AsyncStatus::Success(success_message(&self.nodes, node_id));
                Ok(())
            }
            Err(message) => {
                let error = CascadeError::remote(message, SUBMIT_FALLBACK_ERROR);
                self.submit_status = AsyncStatus::Error(error.to_string());
                Err(error)
            }
        }
    }

    /// Set the workflow selection and clear every level below it. Any
    /// outstanding detail fetch is invalidated.
    fn reset_workflow_level(&mut self, workflow_id: Option<String>) {
        self.selection = SelectionState {
            workflow_id,
            node_id: None,
            field_path: None,
        };
        self.nodes.clear();
        self.fields.clear();
        self.nodes_loading = false;
        self.detail_generation += 1;
    }

    fn issue_detail_fetch(&mut self) -> Vec<Effect> {
        let Some(workflow_id) = self.selection.workflow_id.clone() else {
            return Vec::new();
        };
        self.nodes_loading = true;
        debug!(generation = self.detail_generation, %workflow_id, "workflow detail fetch issued");

        vec![Effect::FetchWorkflowDetail {
            generation: self.detail_generation,
            credentials: self.credentials.clone(),
            workflow_id,
        }]
    }

    fn ensure_current(&self, lane: &'static str, generation: u64, current: u64) -> Result<(), CascadeError> {
        if generation == current {
            return Ok(());
        }
        Err(CascadeError::StaleResultDiscarded {
            lane,
            generation,
            current,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptline_types::Node;
    use serde_json::json;

    fn credentials() -> Credentials {
        Credentials::new("https://n8n.example.com", "key")
    }

    fn detail_with(nodes: Vec<Node>) -> WorkflowDetail {
        WorkflowDetail {
            id: "1".into(),
            name: "Wf1".into(),
            nodes,
        }
    }

    fn ai_node() -> Node {
        Node::new("n1", "AI Node", "gemini", json!({ "prompt": "hi" }))
    }

    fn detail_generation(effects: &[Effect]) -> u64 {
        match effects {
            [Effect::FetchWorkflowDetail { generation, .. }] => *generation,
            other => panic!("expected a single detail fetch, got {other:?}"),
        }
    }

    /// Connected state with workflow "1" selected, node "n1" loaded and selected,
    /// and the "prompt" field chosen.
    fn fully_selected() -> CascadeState {
        let mut state = CascadeState::new();
        let effects = state.apply_connect(credentials()).expect("connect");
        let Effect::ListWorkflows { generation, .. } = &effects[0] else {
            panic!("expected list workflows");
        };
        state
            .apply_workflows_loaded(*generation, Ok(vec![Workflow::new("1", "Wf1"), Workflow::new("2", "Wf2")]))
            .expect("workflows");
        let generation = detail_generation(&state.apply_workflow_selected("1"));
        state
            .apply_workflow_detail_loaded(generation, Ok(detail_with(vec![ai_node()])))
            .expect("detail");
        state.apply_node_selected("n1").expect("node");
        state.apply_field_selected("prompt").expect("field");
        state
    }

    #[test]
    fn connect_requires_url_and_key() {
        let mut state = CascadeState::new();
        let error = state.update(Msg::Connect(Credentials::new("", "key"))).unwrap_err();
        assert!(matches!(error, CascadeError::Validation(_)));
        assert!(state.connect_status().error().is_some());
        assert_eq!(state.credentials(), &Credentials::default());
    }

    #[test]
    fn connect_clears_downstream_and_requests_listing() {
        let mut state = fully_selected();
        let effects = state.update(Msg::Connect(credentials())).expect("connect");

        assert!(matches!(effects.as_slice(), [Effect::ListWorkflows { .. }]));
        assert!(state.connect_status().is_loading());
        assert!(state.workflows().is_empty());
        assert!(state.nodes().is_empty());
        assert!(state.fields().is_empty());
        assert_eq!(state.selection(), &SelectionState::default());
    }

    #[test]
    fn connect_failure_reports_message_and_leaves_list_empty() {
        let mut state = CascadeState::new();
        let effects = state.apply_connect(credentials()).expect("connect");
        let Effect::ListWorkflows { generation, .. } = &effects[0] else {
            panic!("expected list workflows");
        };
        let error = state.apply_workflows_loaded(*generation, Err("HTTP 401".into())).unwrap_err();
        assert_eq!(error, CascadeError::Remote("HTTP 401".into()));
        assert_eq!(state.connect_status().error(), Some("HTTP 401"));
        assert!(state.workflows().is_empty());
    }

    #[test]
    fn blank_remote_messages_get_a_fallback() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        let _ = state.apply_workflows_loaded(1, Err("  ".into()));
        assert_eq!(state.connect_status().error(), Some(CONNECT_FALLBACK_ERROR));
    }

    #[test]
    fn superseded_connect_result_is_discarded() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("first connect");
        state.apply_connect(credentials()).expect("second connect");

        let error = state.apply_workflows_loaded(1, Ok(vec![Workflow::new("old", "Old")])).unwrap_err();
        assert!(error.is_stale());
        assert!(state.workflows().is_empty());
        assert!(state.connect_status().is_loading());
    }

    #[test]
    fn selecting_a_workflow_clears_lower_levels_synchronously() {
        let mut state = fully_selected();
        let effects = state.update(Msg::SelectWorkflow("2".into())).expect("select");

        assert!(matches!(
            effects.as_slice(),
            [Effect::FetchWorkflowDetail { workflow_id, .. }] if workflow_id == "2"
        ));
        assert!(state.nodes().is_empty());
        assert!(state.fields().is_empty());
        assert_eq!(state.selection().workflow_id.as_deref(), Some("2"));
        assert_eq!(state.selection().node_id, None);
        assert_eq!(state.selection().field_path, None);
        assert!(state.nodes_loading());
        assert_eq!(state.workflows().len(), 2);
    }

    #[test]
    fn selecting_empty_workflow_issues_no_fetch() {
        let mut state = fully_selected();
        let effects = state.apply_workflow_selected("");
        assert!(effects.is_empty());
        assert_eq!(state.selection(), &SelectionState::default());
        assert!(!state.nodes_loading());
    }

    #[test]
    fn only_the_latest_detail_fetch_commits() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        let first = detail_generation(&state.apply_workflow_selected("A"));
        let second = detail_generation(&state.apply_workflow_selected("B"));

        let stale = state
            .apply_workflow_detail_loaded(first, Ok(detail_with(vec![Node::new("a1", "From A", "t", json!({}))])))
            .unwrap_err();
        assert!(stale.is_stale());
        assert!(state.nodes().is_empty());
        assert!(state.nodes_loading());

        state
            .apply_workflow_detail_loaded(second, Ok(detail_with(vec![Node::new("b1", "From B", "t", json!({}))])))
            .expect("current detail");
        assert!(state.nodes().contains("b1"));
        assert!(!state.nodes().contains("a1"));
    }

    #[test]
    fn stale_detail_failure_does_not_touch_status() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        let first = detail_generation(&state.apply_workflow_selected("A"));
        state.apply_workflow_selected("B");

        let stale = state.apply_workflow_detail_loaded(first, Err("HTTP 404".into())).unwrap_err();
        assert!(stale.is_stale());
        assert!(state.connect_status().error().is_none());
    }

    #[test]
    fn detail_failure_sets_error_and_leaves_nodes_empty() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        let generation = detail_generation(&state.apply_workflow_selected("1"));
        let error = state.apply_workflow_detail_loaded(generation, Err("HTTP 404: not found".into())).unwrap_err();

        assert_eq!(error, CascadeError::Remote("HTTP 404: not found".into()));
        assert_eq!(state.connect_status().error(), Some("HTTP 404: not found"));
        assert!(state.nodes().is_empty());
        assert!(!state.nodes_loading());
    }

    #[test]
    fn credential_change_invalidates_in_flight_detail_and_refetches() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        state.apply_workflows_loaded(1, Ok(vec![Workflow::new("1", "Wf1")])).expect("listing");
        let first = detail_generation(&state.apply_workflow_selected("1"));

        let replacement = Credentials::new("https://other.example.com", "other-key");
        let effects = state.update(Msg::UpdateCredentials(replacement.clone())).expect("update");
        let Effect::FetchWorkflowDetail {
            generation,
            credentials,
            workflow_id,
        } = &effects[0]
        else {
            panic!("expected refetch");
        };
        assert_eq!(credentials, &replacement);
        assert_eq!(workflow_id, "1");
        assert_ne!(*generation, first);

        let stale = state.apply_workflow_detail_loaded(first, Ok(detail_with(vec![ai_node()]))).unwrap_err();
        assert!(stale.is_stale());
        assert!(state.nodes().is_empty());
    }

    #[test]
    fn credential_change_drops_listing_from_previous_instance() {
        let mut state = CascadeState::new();
        let Effect::ListWorkflows { generation: first, .. } = state.apply_connect(credentials()).expect("connect")[0].clone()
        else {
            panic!("expected listing");
        };

        let replacement = Credentials::new("https://other.example.com", "other-key");
        let effects = state.apply_credentials_updated(replacement.clone()).expect("update");
        let [Effect::ListWorkflows { generation, credentials: captured }] = effects.as_slice() else {
            panic!("expected reissued listing, got {effects:?}");
        };
        assert_eq!(captured, &replacement);
        assert_ne!(*generation, first);

        let stale = state
            .apply_workflows_loaded(first, Ok(vec![Workflow::new("old", "From old instance")]))
            .unwrap_err();
        assert!(stale.is_stale());
        assert!(state.workflows().is_empty());
        assert!(state.connect_status().is_loading());

        state
            .apply_workflows_loaded(*generation, Ok(vec![Workflow::new("new", "From new instance")]))
            .expect("current listing");
        assert_eq!(state.workflows(), &[Workflow::new("new", "From new instance")]);
    }

    #[test]
    fn credential_change_after_listing_keeps_workflows_without_relisting() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        state
            .apply_workflows_loaded(1, Ok(vec![Workflow::new("1", "Wf1")]))
            .expect("listing");

        let effects = state
            .apply_credentials_updated(Credentials::new("https://n8n.example.com", "rotated"))
            .expect("update");
        assert!(effects.is_empty());
        assert_eq!(state.workflows(), &[Workflow::new("1", "Wf1")]);
    }

    #[test]
    fn incomplete_credential_change_is_rejected() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        state.apply_workflow_selected("1");

        let error = state.update(Msg::UpdateCredentials(Credentials::new("", "key"))).unwrap_err();
        assert!(matches!(error, CascadeError::Validation(_)));
        assert_eq!(state.credentials(), &credentials());
        assert!(state.connect_status().error().is_some());
    }

    #[test]
    fn effects_capture_credentials_at_issue_time() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        let effects = state.apply_workflow_selected("1");
        state
            .apply_credentials_updated(Credentials::new("https://other.example.com", "k2"))
            .expect("update");

        let Effect::FetchWorkflowDetail { credentials: captured, .. } = &effects[0] else {
            panic!("expected detail fetch");
        };
        assert_eq!(captured, &credentials());
    }

    #[test]
    fn selecting_a_node_discovers_fields() {
        let state = fully_selected();
        assert_eq!(state.fields(), &["prompt".to_string()]);
        assert_eq!(state.selection().node_id.as_deref(), Some("n1"));
    }

    #[test]
    fn selecting_an_unknown_node_leaves_nothing_selected() {
        let mut state = fully_selected();
        let error = state.update(Msg::SelectNode("ghost".into())).unwrap_err();
        assert!(matches!(error, CascadeError::Validation(_)));
        assert_eq!(state.selection().node_id, None);
        assert_eq!(state.selection().field_path, None);
        assert!(state.fields().is_empty());
    }

    #[test]
    fn field_selection_is_constrained_to_discovered_fields() {
        let mut state = fully_selected();
        assert!(state.apply_field_selected("options.other").is_err());
        assert_eq!(state.selection().field_path.as_deref(), Some("prompt"));

        state.apply_field_selected("").expect("clear");
        assert_eq!(state.selection().field_path, None);
    }

    #[test]
    fn submit_without_node_is_a_validation_error() {
        let mut state = CascadeState::new();
        state.apply_connect(credentials()).expect("connect");
        state.apply_workflow_selected("1");

        let error = state.update(Msg::Submit("hello".into())).unwrap_err();
        assert!(matches!(error, CascadeError::Validation(_)));
        assert!(state.submit_status().error().is_some());
    }

    #[test]
    fn submit_success_names_the_node_and_keeps_selection() {
        let mut state = fully_selected();
        let effects = state.apply_submit("new text").expect("submit");
        let [Effect::WriteNodeField { generation, write, .. }] = effects.as_slice() else {
            panic!("expected a write");
        };
        assert_eq!(write.field_path, "prompt");
        assert!(state.submit_status().is_loading());

        state.apply_submit_completed(*generation, &write.node_id, Ok(())).expect("completed");
        assert_eq!(state.submit_status().success(), Some("Updated prompt on node \"AI Node\""));
        assert_eq!(state.selection().field_path.as_deref(), Some("prompt"));
    }

    #[test]
    fn submit_success_after_node_disappears_uses_generic_message() {
        let mut state = fully_selected();
        let effects = state.apply_submit("new text").expect("submit");
        let [Effect::WriteNodeField { generation, write, .. }] = effects.as_slice() else {
            panic!("expected a write");
        };
        let (generation, node_id) = (*generation, write.node_id.clone());

        state.apply_workflow_selected("2");
        state.apply_submit_completed(generation, &node_id, Ok(())).expect("completed");
        assert_eq!(state.submit_status().success(), Some("Prompt updated"));
    }

    #[test]
    fn submit_failure_does_not_affect_connect_lane() {
        let mut state = fully_selected();
        let effects = state.apply_submit("new text").expect("submit");
        let [Effect::WriteNodeField { generation, .. }] = effects.as_slice() else {
            panic!("expected a write");
        };

        let error = state.apply_submit_completed(*generation, "n1", Err("HTTP 400".into())).unwrap_err();
        assert_eq!(error, CascadeError::Remote("HTTP 400".into()));
        assert_eq!(state.submit_status().error(), Some("HTTP 400"));
        assert!(state.connect_status().success().is_some());
    }

    #[test]
    fn older_submit_completion_is_ignored() {
        let mut state = fully_selected();
        state.apply_submit("first").expect("first");
        state.apply_submit("second").expect("second");

        let stale = state.apply_submit_completed(1, "n1", Err("HTTP 500".into())).unwrap_err();
        assert!(stale.is_stale());
        assert!(state.submit_status().is_loading());
    }

    #[test]
    fn custom_depth_bound_applies_to_field_lists() {
        let mut state = CascadeState::new().with_discovery(DiscoveryOptions { max_depth: 0 });
        state.apply_connect(credentials()).expect("connect");
        let generation = detail_generation(&state.apply_workflow_selected("1"));
        let node = Node::new("n1", "AI Node", "gemini", json!({ "options": { "systemMessage": "x" } }));
        state
            .apply_workflow_detail_loaded(generation, Ok(detail_with(vec![node])))
            .expect("detail");
        state.apply_node_selected("n1").expect("node");
        assert!(state.fields().is_empty());
    }
}
