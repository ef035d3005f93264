//! Delay Node
//!
//! A workflow step that waits before continuing. The configuration lives in
//! the node's `data.delay`:
//!
//! ```json
//! { "value": 5, "unit": "minutes", "description": "cool-down" }
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{EditorSelection, NodeUpdater, WorkflowEdge, WorkflowNode};

/// Output handle of a delay node
pub const DELAY_OUTPUT_HANDLE: &str = "bottom-handle";

/// Key of the delay configuration inside `data`
const DELAY_KEY: &str = "delay";

/// Unit of a delay
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayUnit {
    /// Seconds
    #[default]
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
    /// Days
    Days,
}

impl DelayUnit {
    /// All units, in selector order
    pub const ALL: [Self; 4] = [Self::Seconds, Self::Minutes, Self::Hours, Self::Days];

    /// Selector label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Seconds => "Seconds",
            Self::Minutes => "Minutes",
            Self::Hours => "Hours",
            Self::Days => "Days",
        }
    }

    fn seconds(self) -> u64 {
        match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 60 * 60,
            Self::Days => 24 * 60 * 60,
        }
    }
}

impl fmt::Display for DelayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
        })
    }
}

/// Delay configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayConfig {
    /// Amount, at least 1
    pub value: u32,
    /// Unit of `value`
    pub unit: DelayUnit,
    /// Free-form note
    #[serde(default)]
    pub description: String,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            value: 1,
            unit: DelayUnit::Seconds,
            description: String::new(),
        }
    }
}

impl DelayConfig {
    /// Read `data.delay` from a node; missing or malformed configs yield `None`
    #[must_use]
    pub fn from_node(node: &WorkflowNode) -> Option<Self> {
        let raw = node.data.get(DELAY_KEY)?;
        match serde_json::from_value::<Self>(raw.clone()) {
            Ok(config) => Some(config),
            Err(e) => {
                debug!(node_id = %node.id, error = %e, "Ignoring malformed delay config");
                None
            }
        }
    }

    /// Wall-clock length of the delay
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.value.max(1)) * self.unit.seconds())
    }

    /// Summary line, e.g. `Delay: 5 minutes`
    #[must_use]
    pub fn summary(&self) -> String {
        format!("Delay: {} {}", self.value, self.unit)
    }
}

/// Parse the value input the way a numeric text box does: leading digits,
/// anything unusable (empty, non-numeric, zero or negative) becomes 1.
fn parse_value_input(raw: &str) -> u32 {
    let digits: String = raw
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse::<u32>().ok().filter(|v| *v >= 1).unwrap_or(1)
}

/// Edit form of a delay node
#[derive(Clone, Debug)]
pub struct DelayForm {
    node: WorkflowNode,
    delay: DelayConfig,
}

impl DelayForm {
    /// Open the form for `node`, starting from its stored config if any
    #[must_use]
    pub fn new(node: WorkflowNode) -> Self {
        let delay = DelayConfig::from_node(&node).unwrap_or_default();
        Self { node, delay }
    }

    /// Current (unsaved) configuration
    #[must_use]
    pub fn delay(&self) -> &DelayConfig {
        &self.delay
    }

    /// The node being edited
    #[must_use]
    pub fn node(&self) -> &WorkflowNode {
        &self.node
    }

    /// Apply the value text box
    pub fn set_value_input(&mut self, raw: &str) {
        self.delay.value = parse_value_input(raw);
    }

    /// Apply the unit selector
    pub fn set_unit(&mut self, unit: DelayUnit) {
        self.delay.unit = unit;
    }

    /// Apply the description text area
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.delay.description = description.into();
    }

    /// Write the configuration into a copy of the node and hand it over
    pub fn save(&self, updater: &mut impl NodeUpdater) {
        let mut node = self.node.clone();
        let delay = serde_json::to_value(&self.delay).unwrap_or(Value::Null);
        node.data.insert(DELAY_KEY.to_string(), delay);
        debug!(node_id = %node.id, delay = %self.delay.summary(), "Saving delay node");
        updater.update_node(node);
    }

    /// Detach the node: drop every edge touching it, close the form and
    /// clear the selection. Returns how many edges were removed.
    ///
    /// The node itself stays in the graph.
    pub fn delete(&self, edges: &mut Vec<WorkflowEdge>, selection: &mut EditorSelection) -> usize {
        let before = edges.len();
        edges.retain(|edge| !edge.touches(&self.node.id));
        selection.clear();

        let removed = before - edges.len();
        debug!(node_id = %self.node.id, removed, "Detached delay node");
        removed
    }
}

/// What the delay node shows on the canvas
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelayNodeView {
    /// Node label
    pub label: String,
    /// `Delay: {value} {unit}` or `No delay configured`
    pub summary: String,
    /// Description, when set
    pub description: Option<String>,
    /// Whether the output handle has an outgoing edge
    pub output_connected: bool,
}

impl DelayNodeView {
    /// Build the canvas view of `node`
    #[must_use]
    pub fn new(node: &WorkflowNode, edges: &[WorkflowEdge]) -> Self {
        let delay = DelayConfig::from_node(node);
        let output_connected = edges.iter().any(|edge| {
            edge.source == node.id && edge.source_handle.as_deref() == Some(DELAY_OUTPUT_HANDLE)
        });

        Self {
            label: node.label().unwrap_or_default().to_string(),
            summary: delay
                .as_ref()
                .map_or_else(|| "No delay configured".to_string(), DelayConfig::summary),
            description: delay
                .map(|d| d.description)
                .filter(|description| !description.is_empty()),
            output_connected,
        }
    }
}
