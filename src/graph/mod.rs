//! The visual node/edge graph edited by the user.

pub mod edge;
pub mod node;
pub mod retag;

pub use edge::*;
pub use node::*;
pub use retag::{connect, retag_branch_target};

use crate::error::ConfigError;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fs;

/// Nodes and edges of one editing session. Derived from the step model, never
/// the source of truth.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlowGraph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl FlowGraph {
    pub fn new(nodes: Vec<VisualNode>, edges: Vec<VisualEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut VisualNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&VisualEdge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn node_ids(&self) -> AHashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// Same set of node ids (order and payloads ignored).
    pub fn same_node_set(&self, other: &FlowGraph) -> bool {
        self.nodes.len() == other.nodes.len() && self.node_ids() == other.node_ids()
    }

    /// Adds a node unless one with the same id exists. Returns whether it was added.
    pub fn add_node(&mut self, node: VisualNode) -> bool {
        if self.node(&node.id).is_some() {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Removes a node and every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Option<VisualNode> {
        let pos = self.nodes.iter().position(|n| n.id == id)?;
        self.edges.retain(|e| e.source != id && e.target != id);
        Some(self.nodes.remove(pos))
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Adds an edge unless one with the same id exists.
    pub fn add_edge(&mut self, edge: VisualEdge) -> bool {
        if self.edge(&edge.id).is_some() {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn remove_edge(&mut self, id: &str) -> Option<VisualEdge> {
        let pos = self.edges.iter().position(|e| e.id == id)?;
        Some(self.edges.remove(pos))
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a graph saved by the editing surface.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
