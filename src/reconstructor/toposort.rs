use crate::graph::{VisualEdge, VisualNode};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::VecDeque;
use tracing::debug;

/// The axis used to order nodes that are equally ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TieBreak {
    /// Ascending `y`: main-line flow runs top to bottom.
    Vertical,
    /// Ascending `x`: branch steps fan out left to right.
    Horizontal,
}

impl TieBreak {
    fn compare(self, a: &VisualNode, b: &VisualNode) -> Ordering {
        match self {
            TieBreak::Vertical => a.position.y.total_cmp(&b.position.y),
            TieBreak::Horizontal => a.position.x.total_cmp(&b.position.x),
        }
    }
}

/// Orders `members` with Kahn's algorithm over the edges accepted by `accept`
/// whose endpoints both lie in `members`.
///
/// Ties are broken along `axis`. Nodes the sort never reaches (cycles, self-loops)
/// are appended in `axis` order, so every member appears exactly once.
pub(crate) fn order_nodes<'a>(
    members: &[&'a VisualNode],
    edges: &[VisualEdge],
    axis: TieBreak,
    accept: impl Fn(&VisualEdge) -> bool,
) -> Vec<&'a VisualNode> {
    let by_id: AHashMap<&str, &'a VisualNode> =
        members.iter().map(|n| (n.id.as_str(), *n)).collect();
    let mut indegree: AHashMap<&str, usize> = by_id.keys().map(|id| (*id, 0)).collect();
    let mut outgoing: AHashMap<&str, Vec<&str>> = AHashMap::new();
    let mut seen_pairs: AHashSet<(&str, &str)> = AHashSet::new();

    for edge in edges {
        if !accept(edge) {
            continue;
        }
        let (from, to) = (edge.source.as_str(), edge.target.as_str());
        if !by_id.contains_key(from) || !by_id.contains_key(to) {
            continue;
        }
        if seen_pairs.insert((from, to)) {
            outgoing.entry(from).or_default().push(to);
            if let Some(degree) = indegree.get_mut(to) {
                *degree += 1;
            }
        }
    }

    let mut queue: VecDeque<&'a VisualNode> = members
        .iter()
        .copied()
        .filter(|n| indegree.get(n.id.as_str()).copied().unwrap_or(0) == 0)
        .sorted_by(|a, b| axis.compare(a, b))
        .collect();
    let mut visited: AHashSet<&str> = AHashSet::new();
    let mut ordered = Vec::with_capacity(members.len());

    while let Some(node) = queue.pop_front() {
        if !visited.insert(node.id.as_str()) {
            continue;
        }
        ordered.push(node);

        let successors = outgoing
            .get(node.id.as_str())
            .into_iter()
            .flatten()
            .filter_map(|id| by_id.get(id).copied())
            .sorted_by(|a, b| axis.compare(a, b));
        for next in successors {
            if let Some(degree) = indegree.get_mut(next.id.as_str()) {
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    queue.push_back(next);
                }
            }
        }
    }

    let unreached: Vec<&'a VisualNode> = members
        .iter()
        .copied()
        .filter(|n| !visited.contains(n.id.as_str()))
        .unique_by(|n| n.id.as_str())
        .sorted_by(|a, b| axis.compare(a, b))
        .collect();
    if !unreached.is_empty() {
        debug!(
            count = unreached.len(),
            ids = ?unreached.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            "Appending nodes the topological sort did not reach"
        );
    }
    ordered.extend(unreached);
    ordered
}
