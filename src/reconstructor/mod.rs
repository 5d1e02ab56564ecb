//! Visual graph → step model.
//!
//! The inverse of the projector: `reconstruct(project(S)) == S` for any model
//! that was not edited in between. On hand-edited graphs the order is recovered
//! from connectivity first and on-screen position second, and no step node is
//! ever dropped.

mod toposort;

use crate::error::ReconstructError;
use crate::graph::{FlowGraph, NodeKind, VisualEdge, VisualNode};
use crate::model::Step;
use ahash::{AHashMap, AHashSet};
use toposort::{TieBreak, order_nodes};
use tracing::warn;

pub fn reconstruct_graph(graph: &FlowGraph) -> Result<Vec<Step>, ReconstructError> {
    reconstruct(&graph.nodes, &graph.edges)
}

/// Rebuilds the ordered step list from an arbitrarily edited graph.
///
/// Only a node whose payload contradicts its declared kind is an error. Dangling
/// edges, cycles, multiple roots and orphans are all resolved by position.
pub fn reconstruct(
    nodes: &[VisualNode],
    edges: &[VisualEdge],
) -> Result<Vec<Step>, ReconstructError> {
    if let Some(bad) = nodes.iter().find(|n| !n.is_consistent()) {
        return Err(ReconstructError::PayloadMismatch {
            node_id: bad.id.clone(),
            kind: bad.kind,
            found: bad.data.describe(),
        });
    }

    let live_branches: AHashSet<&str> = nodes
        .iter()
        .filter(|n| n.kind == NodeKind::ResultStep)
        .filter_map(|n| n.step())
        .flat_map(|s| s.branches().iter().map(|b| b.id.as_str()))
        .collect();

    let mut main_line: Vec<&VisualNode> = Vec::new();
    let mut branch_members: AHashMap<&str, Vec<&VisualNode>> = AHashMap::new();
    for node in nodes {
        match (node.kind, node.branch_id()) {
            (NodeKind::Context, _) => {}
            (NodeKind::BranchStep, Some(branch_id)) if live_branches.contains(branch_id) => {
                branch_members.entry(branch_id).or_default().push(node);
            }
            (NodeKind::BranchStep, branch_id) => {
                warn!(
                    node = %node.id,
                    branch = ?branch_id,
                    "Branch step belongs to no existing branch; keeping it on the main line"
                );
                main_line.push(node);
            }
            (NodeKind::RegularStep | NodeKind::ResultStep, _) => main_line.push(node),
        }
    }

    let ordered = order_nodes(&main_line, edges, TieBreak::Vertical, |e| !e.is_branch_edge());

    let steps = ordered
        .into_iter()
        .filter_map(|node| {
            let mut step = node.step()?.clone();
            if node.kind == NodeKind::ResultStep {
                if let Some(branches) = step.branches_mut() {
                    for branch in branches.iter_mut() {
                        branch.steps = rebuild_branch(
                            branch_members.get(branch.id.as_str()).map(Vec::as_slice),
                            edges,
                        );
                    }
                }
            }
            Some(step)
        })
        .collect();
    Ok(steps)
}

/// Orders one branch's members left to right; a branch with no members comes back empty.
fn rebuild_branch(members: Option<&[&VisualNode]>, edges: &[VisualEdge]) -> Vec<Step> {
    let Some(members) = members else {
        return Vec::new();
    };
    order_nodes(members, edges, TieBreak::Horizontal, |_| true)
        .into_iter()
        .filter_map(|node| node.step().cloned())
        .collect()
}
