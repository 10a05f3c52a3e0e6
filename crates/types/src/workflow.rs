//! Workflow and node models returned by the remote instance.
//!
//! Only the fields the cascade needs are typed. Node `parameters` stay an
//! untyped [`JsonValue`] because every node type ships its own configuration
//! shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

/// Summary entry from the workflow listing.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Workflow {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl Workflow {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One page of the workflow listing.
///
/// `next_cursor` is present while more pages remain.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPage {
    #[serde(default)]
    pub data: Vec<Workflow>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Processing node inside a workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Raw node configuration; arbitrary nested JSON.
    #[serde(default)]
    pub parameters: JsonValue,
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: impl Into<String>, parameters: JsonValue) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            node_type: node_type.into(),
            parameters,
        }
    }
}

/// Detail payload for a single workflow. A missing `nodes` collection
/// deserializes to an empty list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowDetail {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// Nodes of the currently selected workflow, keyed by node id in listing order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeList {
    nodes: IndexMap<String, Node>,
}

impl NodeList {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, node_id: &str) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.nodes.contains_key(node_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// Nodes without an id cannot be selected and are skipped. When ids repeat,
/// the first node wins.
impl FromIterator<Node> for NodeList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        let mut nodes = IndexMap::new();
        for node in iter {
            if node.id.is_empty() {
                warn!(name = %node.name, "skipping node without an id");
                continue;
            }
            if nodes.contains_key(&node.id) {
                warn!(id = %node.id, name = %node.name, "skipping node with duplicate id");
                continue;
            }
            nodes.insert(node.id.clone(), node);
        }
        Self { nodes }
    }
}
