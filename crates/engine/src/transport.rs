//! Remote operations consumed by the cascade.
//!
//! [`WorkflowTransport`] is the seam between the pure cascade and the network.
//! Failures are plain human-readable messages; timeouts and HTTP errors are
//! already folded into them by the implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use promptline_api::InstanceClient;
use promptline_types::{Credentials, Workflow, WorkflowDetail};
use promptline_util::FieldPath;
use serde_json::{Map as JsonMap, Value};
use tracing::{debug, warn};

use crate::cascade::FieldWrite;

#[async_trait]
pub trait WorkflowTransport: Send + Sync {
    async fn list_workflows(&self, credentials: &Credentials) -> Result<Vec<Workflow>, String>;

    async fn fetch_workflow_detail(&self, credentials: &Credentials, workflow_id: &str) -> Result<WorkflowDetail, String>;

    async fn write_node_field(&self, credentials: &Credentials, write: &FieldWrite) -> Result<(), String>;
}

/// Transport backed by the instance REST API. A client is built per call from
/// the credentials captured by the effect, so a credential change never
/// redirects an in-flight request.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

#[async_trait]
impl WorkflowTransport for HttpTransport {
    async fn list_workflows(&self, credentials: &Credentials) -> Result<Vec<Workflow>, String> {
        let client = InstanceClient::new(credentials).map_err(describe)?;
        client.list_workflows().await.map_err(describe)
    }

    async fn fetch_workflow_detail(&self, credentials: &Credentials, workflow_id: &str) -> Result<WorkflowDetail, String> {
        let client = InstanceClient::new(credentials).map_err(describe)?;
        client.get_workflow(workflow_id).await.map_err(describe)
    }

    async fn write_node_field(&self, credentials: &Credentials, write: &FieldWrite) -> Result<(), String> {
        let client = InstanceClient::new(credentials).map_err(describe)?;
        write_field(&client, write).await.map_err(describe)
    }
}

/// Read-modify-write: the field path is re-resolved against the workflow as
/// it is on the server right now, not as it was when the node was listed.
async fn write_field(client: &InstanceClient, write: &FieldWrite) -> Result<()> {
    let mut workflow = client.get_workflow_raw(&write.workflow_id).await?;
    apply_field_write(&mut workflow, write)?;
    client.update_workflow(&write.workflow_id, &workflow).await?;
    debug!(workflow_id = %write.workflow_id, node_id = %write.node_id, field_path = %write.field_path, "field written");
    Ok(())
}

/// Set `write.content` at `write.field_path` inside the matching node's
/// parameters of a raw workflow document.
pub fn apply_field_write(workflow: &mut Value, write: &FieldWrite) -> Result<()> {
    let path: FieldPath = write.field_path.parse()?;
    let nodes = workflow
        .get_mut("nodes")
        .and_then(Value::as_array_mut)
        .context("workflow payload has no node list")?;
    let node = nodes
        .iter_mut()
        .find(|node| node.get("id").and_then(Value::as_str) == Some(write.node_id.as_str()))
        .with_context(|| format!("node '{}' no longer exists in workflow '{}'", write.node_id, write.workflow_id))?
        .as_object_mut()
        .context("node payload is not a JSON object")?;

    let parameters = node
        .entry("parameters")
        .or_insert_with(|| Value::Object(JsonMap::new()));
    if parameters.is_null() {
        *parameters = Value::Object(JsonMap::new());
    }
    path.set(parameters, Value::String(write.content.clone()))?;
    Ok(())
}

fn describe(error: anyhow::Error) -> String {
    let message = format!("{error:#}");
    warn!(error = %message, "transport call failed");
    message
}
