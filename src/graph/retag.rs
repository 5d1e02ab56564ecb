use super::{FlowGraph, NodeKind, NodePayload, VisualEdge};
use tracing::debug;

/// Adds a user-drawn edge and, when it leaves a result node through a branch
/// output into a plain step, moves that step into the branch.
///
/// Returns the id of the branch the target joined, if it was retagged.
pub fn connect(graph: &mut FlowGraph, edge: VisualEdge) -> Option<String> {
    let retagged = retag_branch_target(graph, &edge);
    graph.add_edge(edge);
    retagged
}

/// Retags the target of a `branch-<k>` edge as a member of branch `k`.
///
/// Only a `RegularStep` target is retagged. The step model is untouched; the
/// change takes effect at the next reconstruction.
pub fn retag_branch_target(graph: &mut FlowGraph, edge: &VisualEdge) -> Option<String> {
    let index = edge.branch_index()?;
    let source = graph.node(&edge.source)?;
    if source.kind != NodeKind::ResultStep {
        return None;
    }
    let Some(branch) = source.step().and_then(|s| s.branches().get(index)) else {
        debug!(
            result = %edge.source,
            index,
            "Branch handle does not match any branch of the result block"
        );
        return None;
    };
    let (branch_id, branch_type) = (branch.id.clone(), branch.branch_label.clone());

    let target = graph.node_mut(&edge.target)?;
    if target.kind != NodeKind::RegularStep {
        return None;
    }
    let NodePayload::Step { step } = &target.data else {
        return None;
    };

    target.data = NodePayload::BranchMember {
        step: step.clone(),
        branch_id: branch_id.clone(),
        branch_type,
    };
    target.kind = NodeKind::BranchStep;
    debug!(node = %edge.target, branch = %branch_id, "Retagged step as branch member");
    Some(branch_id)
}
