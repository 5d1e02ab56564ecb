use crate::graph::{FlowGraph, Position, VisualEdge, VisualNode, connect};

/// A single edit coming from the graph editing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphChange {
    AddNode(VisualNode),
    /// Also removes every edge touching the node.
    RemoveNode { id: String },
    MoveNode { id: String, position: Position },
    /// A user-drawn edge. Branch-handle edges may retag their target.
    Connect(VisualEdge),
    RemoveEdge { id: String },
}

impl GraphChange {
    /// Everything except repositioning changes the graph's structure.
    pub fn is_structural(&self) -> bool {
        !matches!(self, GraphChange::MoveNode { .. })
    }

    /// Applies the change. Returns whether the graph was modified.
    pub fn apply(self, graph: &mut FlowGraph) -> bool {
        match self {
            GraphChange::AddNode(node) => graph.add_node(node),
            GraphChange::RemoveNode { id } => graph.remove_node(&id).is_some(),
            GraphChange::MoveNode { id, position } => graph.move_node(&id, position),
            GraphChange::Connect(edge) => {
                let before = graph.edges.len();
                let retagged = connect(graph, edge);
                retagged.is_some() || graph.edges.len() != before
            }
            GraphChange::RemoveEdge { id } => graph.remove_edge(&id).is_some(),
        }
    }
}
