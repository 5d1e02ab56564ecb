//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! webpipe-flow crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use webpipe_flow::prelude::*;
//!
//! # fn run_example() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let route_json = std::fs::read_to_string("path/to/route.json")?;
//! let pipeline = DocumentRoute::from_json(&route_json)?.into_pipeline()?;
//!
//! let graph = Projector::default().project_laid_out(&pipeline);
//! let steps = reconstruct(&graph.nodes, &graph.edges)?;
//! println!("{} steps", steps.len());
//! # Ok(())
//! # }
//! ```

// Step model
pub use crate::model::{
    Branch, BranchCategory, ContextHeader, DocumentPipeline, DocumentRoute, IntoPipeline,
    Operation, OperationRegistry, Pipeline, RegularStep, ResultStep, Step, StepKind,
};

// Visual graph
pub use crate::graph::{FlowGraph, NodeKind, NodePayload, Position, Size, VisualEdge, VisualNode};

// Layout
pub use crate::layout::{
    HierarchicalLayout, LayeredLayout, LayoutConfig, auto_layout, result_node_height,
    step_node_height,
};

// Transformations
pub use crate::projector::Projector;
pub use crate::reconstructor::reconstruct;

// Edit session
pub use crate::session::{EditSession, GraphChange, SessionAction, SessionConfig, SessionState};

// Error types
pub use crate::error::{ConfigError, ConversionError, ModelError, ReconstructError};
