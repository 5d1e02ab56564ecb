use super::change::GraphChange;
use super::config::SessionConfig;
use super::debounce::Debouncer;
use crate::error::ModelError;
use crate::graph::{FlowGraph, NodePayload};
use crate::layout::step_node_height;
use crate::model::edit::{self, find_step};
use crate::model::{ContextHeader, OperationRegistry, Pipeline, Step, StepKind};
use crate::projector::Projector;
use crate::reconstructor::reconstruct_graph;
use ahash::AHashMap;
use std::time::Instant;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// The graph matches the last committed model.
    Clean,
    /// A structural edit happened since the last commit.
    Dirty,
}

/// What a [`EditSession::tick`] or [`EditSession::flush`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Nothing to do.
    Idle,
    /// Dirty, but still inside the debounce window.
    Pending,
    /// Reconstruction produced a different model, now the committed one.
    Committed(Vec<Step>),
    /// Reconstruction matched the committed model; nothing was committed.
    Unchanged,
    /// Reconstruction failed; the committed model was kept.
    Failed,
}

/// Owns the live graph of one selected route or pipeline and reconciles it
/// with the step model.
pub struct EditSession {
    projector: Projector,
    registry: OperationRegistry,
    debouncer: Debouncer,
    header: Option<ContextHeader>,
    committed: Vec<Step>,
    graph: FlowGraph,
    state: SessionState,
    next_id: u64,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            debouncer: Debouncer::new(config.debounce()),
            projector: Projector::builder().with_config(config.layout).build(),
            registry: OperationRegistry::new(),
            header: None,
            committed: Vec::new(),
            graph: FlowGraph::default(),
            state: SessionState::Clean,
            next_id: 0,
        }
    }

    pub fn with_projector(mut self, projector: Projector) -> Self {
        self.projector = projector;
        self
    }

    pub fn with_registry(mut self, registry: OperationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn committed_steps(&self) -> &[Step] {
        &self.committed
    }

    pub fn header(&self) -> Option<&ContextHeader> {
        self.header.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == SessionState::Dirty
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline {
            header: self.header.clone(),
            steps: self.committed.clone(),
        }
    }

    /// Switches to a new route or pipeline. Pending work for the previous
    /// selection is discarded.
    pub fn select(&mut self, pipeline: Pipeline) {
        if self.debouncer.cancel() {
            debug!("Discarding pending reconstruction of the previous selection");
        }
        info!(
            selection = %pipeline.header.as_ref().map(ContextHeader::title).unwrap_or_default(),
            steps = pipeline.steps.len(),
            "Selected pipeline"
        );
        self.graph = self.projector.project_laid_out(&pipeline);
        self.header = pipeline.header;
        self.committed = pipeline.steps;
        self.state = SessionState::Clean;
    }

    /// Drops the selection entirely.
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.header = None;
        self.committed.clear();
        self.graph = FlowGraph::default();
        self.state = SessionState::Clean;
    }

    /// Applies an edit from the graph surface. Structural edits mark the session
    /// dirty and restart the debounce timer; moves never do.
    pub fn apply(&mut self, change: GraphChange, now: Instant) -> bool {
        let structural = change.is_structural();
        let modified = change.apply(&mut self.graph);
        if structural && modified {
            self.state = SessionState::Dirty;
            self.debouncer.schedule(now);
            debug!("Structural change; reconstruction scheduled");
        }
        modified
    }

    /// Runs the reconstruction once the debounce window has passed.
    pub fn tick(&mut self, now: Instant) -> SessionAction {
        if self.state == SessionState::Clean {
            return SessionAction::Idle;
        }
        if !self.debouncer.fire_if_due(now) {
            return SessionAction::Pending;
        }
        self.reconcile()
    }

    /// Runs a pending reconstruction immediately.
    pub fn flush(&mut self) -> SessionAction {
        if self.state == SessionState::Clean {
            return SessionAction::Idle;
        }
        self.debouncer.cancel();
        self.reconcile()
    }

    fn reconcile(&mut self) -> SessionAction {
        self.state = SessionState::Clean;
        match reconstruct_graph(&self.graph) {
            Err(e) => {
                error!(error = %e, "Graph reconstruction failed; keeping the last committed model");
                SessionAction::Failed
            }
            Ok(steps) if steps == self.committed => {
                debug!("Reconstructed model is unchanged; skipping commit");
                SessionAction::Unchanged
            }
            Ok(steps) => {
                debug!(steps = steps.len(), "Committing reconstructed model");
                self.committed = steps;
                self.patch_payloads_from_model();
                SessionAction::Committed(self.committed.clone())
            }
        }
    }

    /// Takes in a model that changed outside the graph (e.g. a source reparse).
    ///
    /// A changed node set rebuilds the graph from scratch; otherwise only node
    /// payloads are patched so user-drawn edges and positions survive. Graph
    /// edits still waiting for reconstruction are reconciled against the new
    /// model right away. Returns whether the graph was rebuilt.
    pub fn sync_external(&mut self, pipeline: Pipeline) -> bool {
        let was_dirty = self.state == SessionState::Dirty;
        if self.debouncer.cancel() {
            debug!("External model change supersedes pending reconstruction");
        }
        let fresh = self.projector.project_pipeline(&pipeline);
        let rebuilt = !fresh.same_node_set(&self.graph);

        if rebuilt {
            debug!("Node set changed; re-projecting graph");
            self.graph = self.projector.project_laid_out(&pipeline);
        } else if was_dirty {
            debug!("Graph has unreconciled edits; patching step payloads only");
        } else {
            let mut by_id: AHashMap<String, _> =
                fresh.nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
            for node in &mut self.graph.nodes {
                if let Some(update) = by_id.remove(&node.id) {
                    node.kind = update.kind;
                    node.size = update.size;
                    node.data = update.data;
                }
            }
        }

        self.header = pipeline.header;
        self.committed = pipeline.steps;
        self.state = SessionState::Clean;

        if was_dirty && !rebuilt {
            self.patch_payloads_from_model();
            self.state = SessionState::Dirty;
            self.reconcile();
        }
        rebuilt
    }

    /// Refreshes every step payload from the committed model, keeping node kinds,
    /// branch tags, positions and edges.
    fn patch_payloads_from_model(&mut self) {
        let config = self.projector.config().clone();
        for node in &mut self.graph.nodes {
            let Some(fresh) = find_step(&self.committed, &node.id) else {
                continue;
            };
            match &mut node.data {
                NodePayload::Step { step } | NodePayload::BranchMember { step, .. } => {
                    *step = fresh.clone();
                    node.size.height = step_node_height(&config, step);
                }
                NodePayload::Context { .. } => {}
            }
        }
    }

    /// Editing-surface callback: replaces one step's source code.
    ///
    /// A step that only exists in the graph so far (added inside the debounce
    /// window) is edited on its node and reaches the model with the next commit.
    pub fn update_code(&mut self, step_id: &str, source_code: &str) -> Result<Vec<Step>, ModelError> {
        if find_step(&self.committed, step_id).is_some() {
            edit::update_code(&mut self.committed, step_id, source_code)?;
            self.patch_payloads_from_model();
        } else {
            self.update_pending_code(step_id, source_code)?;
        }
        Ok(self.committed.clone())
    }

    fn update_pending_code(&mut self, step_id: &str, source_code: &str) -> Result<(), ModelError> {
        let config = self.projector.config();
        let not_found = || ModelError::StepNotFound(step_id.to_string());
        let node = self.graph.node_mut(step_id).ok_or_else(not_found)?;
        let step = node.step_mut().ok_or_else(not_found)?;
        match &mut step.kind {
            StepKind::Regular(regular) => regular.source_code = source_code.to_string(),
            StepKind::Result(_) => return Err(ModelError::NotARegularStep(step_id.to_string())),
        }
        let height = step_node_height(config, step);
        node.size.height = height;
        debug!(node = %step_id, "Updated code of an uncommitted step");
        Ok(())
    }

    /// Editing-surface callback: appends a new step of `operation_type`.
    pub fn add_step(&mut self, operation_type: &str) -> Result<Vec<Step>, ModelError> {
        self.flush();
        let id = self.fresh_step_id();
        let step = self.registry.create_step(operation_type, &id)?;
        let mut pipeline = self.pipeline();
        edit::insert_step(&mut pipeline.steps, step);
        self.sync_external(pipeline);
        Ok(self.committed.clone())
    }

    /// Editing-surface callback: removes a step wherever it lives.
    pub fn delete_step(&mut self, step_id: &str) -> Result<Vec<Step>, ModelError> {
        self.flush();
        let mut pipeline = self.pipeline();
        edit::delete_step(&mut pipeline.steps, step_id)?;
        self.sync_external(pipeline);
        Ok(self.committed.clone())
    }

    fn fresh_step_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("step-{}", self.next_id);
            if find_step(&self.committed, &id).is_none() && self.graph.node(&id).is_none() {
                return id;
            }
        }
    }
}
