//! Step model → visual graph.
//!
//! Projection is deterministic: the same model always yields the same node ids,
//! the same pre-layout positions and byte-identical edges. The session relies on
//! this to tell structural model changes apart from payload-only ones.

use crate::graph::{FlowGraph, Position, Size, VisualEdge, VisualNode};
use crate::layout::{
    HierarchicalLayout, LayeredLayout, LayoutConfig, auto_layout, step_node_height,
};
use crate::model::{ContextHeader, Pipeline, ResultStep, Step, StepKind};

pub struct Projector {
    config: LayoutConfig,
    engine: Box<dyn HierarchicalLayout>,
}

pub struct ProjectorBuilder {
    config: LayoutConfig,
    engine: Option<Box<dyn HierarchicalLayout>>,
}

impl Default for ProjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectorBuilder {
    pub fn new() -> Self {
        Self {
            config: LayoutConfig::default(),
            engine: None,
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the default [`LayeredLayout`] used by [`Projector::project_laid_out`].
    pub fn with_layout_engine(mut self, engine: Box<dyn HierarchicalLayout>) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn build(self) -> Projector {
        let engine = self
            .engine
            .unwrap_or_else(|| Box::new(LayeredLayout::from_config(&self.config)));
        Projector {
            config: self.config,
            engine,
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Projector {
    pub fn builder() -> ProjectorBuilder {
        ProjectorBuilder::new()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn project_pipeline(&self, pipeline: &Pipeline) -> FlowGraph {
        self.project(&pipeline.steps, pipeline.header.as_ref())
    }

    /// Projects and then hands the graph to the layout engine.
    pub fn project_laid_out(&self, pipeline: &Pipeline) -> FlowGraph {
        let graph = self.project_pipeline(pipeline);
        let nodes = auto_layout(graph.nodes, &graph.edges, self.engine.as_ref());
        FlowGraph::new(nodes, graph.edges)
    }

    /// Builds the visual graph for `steps`, rooted at an optional context node.
    pub fn project(&self, steps: &[Step], header: Option<&ContextHeader>) -> FlowGraph {
        let cfg = &self.config;
        let mut graph = FlowGraph::default();
        let mut y = 0.0;
        let mut previous: Option<&str> = None;

        if let Some(header) = header {
            graph.nodes.push(VisualNode::context(
                header.clone(),
                Position::new(0.0, y),
                Size::new(cfg.node_width, cfg.context_node_height),
            ));
            previous = Some(header.node_id());
            y += cfg.context_node_height + cfg.step_gap;
        }

        for step in steps {
            let height = step_node_height(cfg, step);
            graph.nodes.push(VisualNode::main_line(
                step.clone(),
                Position::new(0.0, y),
                Size::new(cfg.node_width, height),
            ));
            if let Some(prev) = previous {
                graph.edges.push(VisualEdge::new(prev, &step.id));
            }
            previous = Some(step.id.as_str());

            y += match &step.kind {
                StepKind::Regular(_) => height + cfg.step_gap,
                StepKind::Result(result) => self.project_branches(&mut graph, step, result, y, height),
            };
        }

        graph
    }

    /// Emits the branch fan-out to the right of a result node and returns how far
    /// the main line must advance to clear it.
    fn project_branches(
        &self,
        graph: &mut FlowGraph,
        step: &Step,
        result: &ResultStep,
        top: f64,
        result_height: f64,
    ) -> f64 {
        let cfg = &self.config;
        let band = self.branch_band_height(result);
        let left = cfg.node_width + cfg.branch_offset_x;

        for (branch_index, branch) in result.branches.iter().enumerate() {
            let branch_y = top + cfg.branch_offset_y + branch_index as f64 * (band + cfg.inter_branch_gap);
            let mut previous: Option<&str> = None;

            for (step_index, branch_step) in branch.steps.iter().enumerate() {
                let height = step_node_height(cfg, branch_step);
                let x = left + step_index as f64 * (cfg.node_width + cfg.branch_step_gap_x);
                graph.nodes.push(VisualNode::branch_member(
                    branch_step.clone(),
                    branch,
                    Position::new(x, branch_y),
                    Size::new(cfg.node_width, height),
                ));
                graph.edges.push(match previous {
                    None => VisualEdge::from_branch(&step.id, &branch_step.id, branch_index),
                    Some(prev) => VisualEdge::chained(prev, &branch_step.id),
                });
                previous = Some(branch_step.id.as_str());
            }
        }

        result_height
            + result.branches.len() as f64 * (band + cfg.inter_branch_gap)
            + cfg.branch_trailing_gap
    }

    /// Height of one branch row: the tallest branch step, never less than a result row.
    fn branch_band_height(&self, result: &ResultStep) -> f64 {
        result
            .branches
            .iter()
            .flat_map(|b| b.steps.iter())
            .map(|s| step_node_height(&self.config, s))
            .fold(self.config.result_branch_row_height, f64::max)
    }
}
