//! Subcommand handlers. Each one drives a [`CascadeController`] through the
//! same steps an interactive session would: connect, select, settle.
//!
//! The transport is passed in so handlers run unchanged against a fake.

use std::io::{IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use promptline_engine::{
    CascadeController, CascadeState, DiscoveryOptions, FieldCandidate, WorkflowTransport, describe_candidates,
};
use promptline_types::{Credentials, Node, NodeList, Workflow};
use serde_json::json;
use tracing::info;

const PREVIEW_LEN: usize = 60;

pub async fn list_workflows(transport: Arc<dyn WorkflowTransport>, credentials: Credentials, json: bool) -> Result<()> {
    let controller = connect(transport, credentials, None).await?;
    let workflows = controller.state().workflows();

    if json {
        println!("{}", serde_json::to_string_pretty(workflows)?);
    } else {
        for workflow in workflows {
            println!("{}\t{}", workflow.id, workflow.name);
        }
    }
    Ok(())
}

pub async fn list_nodes(transport: Arc<dyn WorkflowTransport>, credentials: Credentials, workflow: &str, json: bool) -> Result<()> {
    let mut controller = connect(transport, credentials, None).await?;
    open_workflow(&mut controller, workflow).await?;
    let nodes: Vec<&Node> = controller.state().nodes().iter().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else {
        for node in nodes {
            println!("{}\t{}\t{}", node.id, node.name, node.node_type);
        }
    }
    Ok(())
}

pub async fn list_fields(
    transport: Arc<dyn WorkflowTransport>,
    credentials: Credentials,
    workflow: &str,
    node: &str,
    max_depth: Option<usize>,
    json: bool,
) -> Result<()> {
    let candidates = field_candidates(transport, credentials, workflow, node, max_depth).await?;

    if json {
        let out: Vec<_> = candidates
            .iter()
            .map(|candidate| json!({ "path": candidate.path, "preview": candidate.preview }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if candidates.is_empty() {
        eprintln!("No prompt-like fields found on node '{node}'");
    } else {
        for candidate in candidates {
            println!("{}\t{}", candidate.path, candidate.preview.unwrap_or_default());
        }
    }
    Ok(())
}

pub async fn push(
    transport: Arc<dyn WorkflowTransport>,
    credentials: Credentials,
    target: &FieldTarget<'_>,
    content: String,
    json: bool,
) -> Result<()> {
    let message = push_prompt(transport, credentials, target, content).await?;
    if json {
        println!("{}", json!({ "status": "success", "message": message }));
    } else {
        println!("{message}");
    }
    Ok(())
}

/// Pick the new field content: `--text`, then `--file`, then piped stdin.
pub fn read_content(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path).with_context(|| format!("read content from {}", path.display()));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        bail!("no content given; pass --text, --file, or pipe it on stdin");
    }
    let mut content = String::new();
    stdin.read_to_string(&mut content).context("read content from stdin")?;
    Ok(content)
}

/// Workflow, node and field named on the command line. Workflow and node may
/// be given by id or exact name.
#[derive(Debug, Clone, Copy)]
pub struct FieldTarget<'a> {
    pub workflow: &'a str,
    pub node: &'a str,
    pub field: &'a str,
}

async fn field_candidates(
    transport: Arc<dyn WorkflowTransport>,
    credentials: Credentials,
    workflow: &str,
    node: &str,
    max_depth: Option<usize>,
) -> Result<Vec<FieldCandidate>> {
    let mut controller = connect(transport, credentials, max_depth).await?;
    open_workflow(&mut controller, workflow).await?;
    let node_id = resolve_node(controller.state().nodes(), node)?;
    controller.select_node(node_id.as_str())?;

    let state = controller.state();
    let parameters = state
        .nodes()
        .get(&node_id)
        .map(|node| node.parameters.clone())
        .unwrap_or_default();
    Ok(describe_candidates(&parameters, state.fields(), PREVIEW_LEN))
}

/// Run the full cascade for one write and return the submit lane's message.
async fn push_prompt(
    transport: Arc<dyn WorkflowTransport>,
    credentials: Credentials,
    target: &FieldTarget<'_>,
    content: String,
) -> Result<String> {
    let mut controller = connect(transport, credentials, None).await?;
    open_workflow(&mut controller, target.workflow).await?;
    let node_id = resolve_node(controller.state().nodes(), target.node)?;
    controller.select_node(node_id.as_str())?;
    controller.select_field(target.field)?;
    controller.submit(content)?;
    controller.settle().await?;

    info!(workflow = target.workflow, node = %node_id, field = target.field, "prompt pushed");
    Ok(controller.state().submit_status().success().unwrap_or("Prompt updated").to_string())
}

async fn connect(transport: Arc<dyn WorkflowTransport>, credentials: Credentials, max_depth: Option<usize>) -> Result<CascadeController> {
    let mut state = CascadeState::new();
    if let Some(max_depth) = max_depth {
        state = state.with_discovery(DiscoveryOptions { max_depth });
    }
    let mut controller = CascadeController::with_state(transport, state);
    controller.connect(credentials)?;
    controller.settle().await?;
    Ok(controller)
}

async fn open_workflow(controller: &mut CascadeController, workflow: &str) -> Result<()> {
    let workflow_id = resolve_workflow(controller.state().workflows(), workflow)?;
    controller.select_workflow(workflow_id)?;
    controller.settle().await?;
    Ok(())
}

/// Match a workflow by id, then by exact name. Ambiguous names are rejected.
fn resolve_workflow(workflows: &[Workflow], needle: &str) -> Result<String> {
    if let Some(workflow) = workflows.iter().find(|workflow| workflow.id == needle) {
        return Ok(workflow.id.clone());
    }
    let ids: Vec<&str> = workflows
        .iter()
        .filter(|workflow| workflow.name == needle)
        .map(|workflow| workflow.id.as_str())
        .collect();
    single_match("workflow", needle, &ids)
}

/// Match a node by id, then by exact name.
fn resolve_node(nodes: &NodeList, needle: &str) -> Result<String> {
    if nodes.contains(needle) {
        return Ok(needle.to_string());
    }
    let ids: Vec<&str> = nodes
        .iter()
        .filter(|node| node.name == needle)
        .map(|node| node.id.as_str())
        .collect();
    single_match("node", needle, &ids)
}

fn single_match(kind: &str, needle: &str, ids: &[&str]) -> Result<String> {
    match ids {
        [id] => Ok(id.to_string()),
        [] => Err(anyhow!("no {kind} with id or name '{needle}'")),
        _ => Err(anyhow!("{kind} name '{needle}' is ambiguous; use one of the ids: {}", ids.join(", "))),
    }
}
