//! Submission coordinator: turns a complete selection into a field write.

use promptline_types::NodeList;

use crate::cascade::SelectionState;
use crate::error::CascadeError;

/// Everything the transport needs to write one prompt into one node field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWrite {
    pub workflow_id: String,
    pub node_id: String,
    pub field_path: String,
    pub content: String,
}

impl FieldWrite {
    /// Build a write from the current selection, or explain what is missing.
    pub fn from_selection(selection: &SelectionState, content: &str) -> Result<Self, CascadeError> {
        if content.is_empty() {
            return Err(CascadeError::validation("Prompt content is empty"));
        }
        let (Some(workflow_id), Some(node_id), Some(field_path)) = (
            selection.workflow_id.as_deref(),
            selection.node_id.as_deref(),
            selection.field_path.as_deref(),
        ) else {
            return Err(CascadeError::validation(
                "Select a workflow, a node, and a field before submitting",
            ));
        };

        Ok(Self {
            workflow_id: workflow_id.to_string(),
            node_id: node_id.to_string(),
            field_path: field_path.to_string(),
            content: content.to_string(),
        })
    }
}

/// Success message for a completed write, naming the node by its display name
/// in the node list as it is now. Falls back to a generic message if the node
/// has since disappeared.
pub fn success_message(nodes: &NodeList, node_id: &str) -> String {
    match nodes.get(node_id) {
        Some(node) if !node.name.is_empty() => format!("Updated prompt on node \"{}\"", node.name),
        _ => "Prompt updated".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptline_types::Node;
    use serde_json::Value;

    fn complete_selection() -> SelectionState {
        SelectionState {
            workflow_id: Some("1".into()),
            node_id: Some("n1".into()),
            field_path: Some("prompt".into()),
        }
    }

    #[test]
    fn empty_content_is_rejected() {
        let error = FieldWrite::from_selection(&complete_selection(), "").unwrap_err();
        assert_eq!(error, CascadeError::validation("Prompt content is empty"));
    }

    #[test]
    fn incomplete_selection_is_rejected() {
        let mut selection = complete_selection();
        selection.node_id = None;
        selection.field_path = None;
        assert!(matches!(
            FieldWrite::from_selection(&selection, "hello"),
            Err(CascadeError::Validation(_))
        ));
    }

    #[test]
    fn complete_selection_builds_write() {
        let write = FieldWrite::from_selection(&complete_selection(), "new text").expect("write");
        assert_eq!(write.field_path, "prompt");
        assert_eq!(write.content, "new text");
    }

    #[test]
    fn success_message_falls_back_when_node_is_gone() {
        let nodes: NodeList = vec![Node::new("n1", "AI Node", "gemini", Value::Null)].into_iter().collect();
        assert_eq!(success_message(&nodes, "n1"), "Updated prompt on node \"AI Node\"");
        assert_eq!(success_message(&NodeList::default(), "n1"), "Prompt updated");
    }
}
