//! Top-to-bottom layered placement.
//!
//! Phases:
//!   1. Cycle collapse (strongly connected components share a rank)
//!   2. Rank assignment (longest path from the sources)
//!   3. In-rank ordering (first-seen order)
//!   4. Coordinate assignment (rank rows, centred on x = 0)

use super::config::LayoutConfig;
use crate::graph::{Position, Size, VisualEdge, VisualNode};
use ahash::AHashMap;
use itertools::Itertools;
use petgraph::Direction;
use petgraph::algo::{condensation, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

/// A node as seen by a layout engine: an id and the box it needs.
#[derive(Debug, Clone, Copy)]
pub struct LayoutNode<'a> {
    pub id: &'a str,
    pub size: Size,
}

/// Contract for a hierarchical (ranked) layout algorithm.
///
/// Implementations return the centre point of every node they placed.
pub trait HierarchicalLayout {
    fn layout(&self, nodes: &[LayoutNode<'_>], edges: &[(&str, &str)]) -> AHashMap<String, Position>;
}

/// Default layered layout engine.
#[derive(Debug, Clone, Copy)]
pub struct LayeredLayout {
    pub rank_separation: f64,
    pub node_separation: f64,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl LayeredLayout {
    pub fn new(rank_separation: f64, node_separation: f64) -> Self {
        Self {
            rank_separation,
            node_separation,
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.rank_separation, config.node_separation)
    }

    /// Longest-path rank per input node, cycles collapsed first.
    fn assign_ranks(nodes: &[LayoutNode<'_>], edges: &[(&str, &str)]) -> Vec<usize> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let mut index_of: AHashMap<&str, NodeIndex> = AHashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            let idx = graph.add_node(i);
            index_of.entry(node.id).or_insert(idx);
        }
        for (source, target) in edges {
            if let (Some(&a), Some(&b)) = (index_of.get(source), index_of.get(target)) {
                graph.add_edge(a, b, ());
            }
        }

        let condensed = condensation(graph, true);
        let order = toposort(&condensed, None)
            .unwrap_or_else(|_| condensed.node_indices().collect());

        let mut component_rank = vec![0usize; condensed.node_count()];
        for component in order {
            component_rank[component.index()] = condensed
                .neighbors_directed(component, Direction::Incoming)
                .map(|pred| component_rank[pred.index()] + 1)
                .max()
                .unwrap_or(0);
        }

        let mut ranks = vec![0usize; nodes.len()];
        for component in condensed.node_indices() {
            for &member in &condensed[component] {
                ranks[member] = component_rank[component.index()];
            }
        }
        ranks
    }
}

impl HierarchicalLayout for LayeredLayout {
    fn layout(&self, nodes: &[LayoutNode<'_>], edges: &[(&str, &str)]) -> AHashMap<String, Position> {
        let ranks = Self::assign_ranks(nodes, edges);
        let rows = (0..nodes.len()).into_group_map_by(|&i| ranks[i]);

        let mut centres = AHashMap::with_capacity(nodes.len());
        let mut row_top = 0.0;
        for rank in rows.keys().copied().sorted() {
            let members = &rows[&rank];
            let row_height = members
                .iter()
                .map(|&i| nodes[i].size.height)
                .fold(0.0, f64::max);
            let row_width = members.iter().map(|&i| nodes[i].size.width).sum::<f64>()
                + self.node_separation * members.len().saturating_sub(1) as f64;

            let mut cursor = -row_width / 2.0;
            for &i in members {
                let node = &nodes[i];
                centres.insert(
                    node.id.to_string(),
                    Position::new(cursor + node.size.width / 2.0, row_top + row_height / 2.0),
                );
                cursor += node.size.width + self.node_separation;
            }
            row_top += row_height + self.rank_separation;
        }
        centres
    }
}

/// Runs `engine` over the graph and moves every node so the engine's centre
/// point becomes the node's top-left corner minus half its size.
pub fn auto_layout(
    mut nodes: Vec<VisualNode>,
    edges: &[VisualEdge],
    engine: &dyn HierarchicalLayout,
) -> Vec<VisualNode> {
    let centres = {
        let layout_nodes: Vec<LayoutNode<'_>> = nodes
            .iter()
            .map(|n| LayoutNode {
                id: &n.id,
                size: n.size,
            })
            .collect();
        let layout_edges: Vec<(&str, &str)> = edges
            .iter()
            .map(|e| (e.source.as_str(), e.target.as_str()))
            .collect();
        engine.layout(&layout_nodes, &layout_edges)
    };

    for node in &mut nodes {
        if let Some(centre) = centres.get(&node.id) {
            node.position = Position::new(
                centre.x - node.size.width / 2.0,
                centre.y - node.size.height / 2.0,
            );
        }
    }
    nodes
}
