//! Workflow Editor Nodes
//!
//! Node-specific editing logic for the agent workflow editor. The graph
//! editor itself is external; this module only knows the node and edge
//! fields the node forms read and write.

pub mod delay;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use delay::{DelayConfig, DelayForm, DelayNodeView, DelayUnit, DELAY_OUTPUT_HANDLE};

/// A node of the workflow graph
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    /// Node id
    pub id: String,
    /// Node payload (label, per-type configuration)
    #[serde(default)]
    pub data: Map<String, Value>,
    /// Fields owned by the graph editor (type, position, ...), passed through
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WorkflowNode {
    /// Display label from `data.label`
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.data.get("label").and_then(Value::as_str)
    }
}

/// A directed edge of the workflow graph
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    /// Edge id
    pub id: String,
    /// Source node id
    pub source: String,
    /// Target node id
    pub target: String,
    /// Output handle on the source node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
}

impl WorkflowEdge {
    /// Whether the edge starts or ends at `node_id`
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Receives edited nodes
pub trait NodeUpdater {
    /// Replace the node with the same id
    fn update_node(&mut self, node: WorkflowNode);
}

/// Editor selection state shared by node forms
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditorSelection {
    /// Currently selected node
    pub node: Option<WorkflowNode>,
    /// Whether the node form panel is open
    pub form_open: bool,
}

impl EditorSelection {
    /// Select `node` and open its form
    #[must_use]
    pub fn select(node: WorkflowNode) -> Self {
        Self {
            node: Some(node),
            form_open: true,
        }
    }

    /// Close the form and clear the selection
    pub fn clear(&mut self) {
        self.form_open = false;
        self.node = None;
    }
}
