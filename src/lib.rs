//! # WebPipe Flow - Pipeline/Graph Transformation Engine
//!
//! **webpipe-flow** is the engine behind the box-and-noodle view of a WebPipe
//! program. A route or named pipeline is an ordered list of steps, optionally
//! ending in a `result` block whose branches (`ok(200)`, `error(500)`, ...) hold
//! their own step lists. This crate turns that linear-with-branches model into a
//! node/edge graph with a deterministic layout, and turns an arbitrarily edited
//! graph back into a valid model.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Steps**: Convert the parser's output into a [`model::Pipeline`],
//!     either by hand or through the [`model::IntoPipeline`] trait.
//! 2.  **Project**: [`projector::Projector`] builds the visual graph, rooted at a
//!     synthetic route/pipeline node.
//! 3.  **Edit**: Feed user edits into an [`session::EditSession`]. Structural
//!     edits are debounced and reconciled through the reconstructor.
//! 4.  **Commit**: A [`session::SessionAction::Committed`] carries the rebuilt
//!     step list, ready to be printed back to source.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use webpipe_flow::prelude::*;
//! use std::time::{Duration, Instant};
//!
//! let pipeline = Pipeline::route(
//!     "GET",
//!     "/users",
//!     vec![
//!         Step::regular("s1", "pg", "sql", "SELECT * FROM users"),
//!         Step::regular("s2", "jq", "text", "{ users: .data.rows }"),
//!     ],
//! );
//!
//! // Round-trip without a session.
//! let graph = Projector::default().project_pipeline(&pipeline);
//! let steps = reconstruct(&graph.nodes, &graph.edges).unwrap();
//! assert_eq!(steps, pipeline.steps);
//!
//! // Or keep a live session.
//! let mut session = EditSession::new(SessionConfig::default());
//! session.select(pipeline);
//! let t0 = Instant::now();
//! session.apply(GraphChange::RemoveEdge { id: "s1-s2".to_string() }, t0);
//! match session.tick(t0 + Duration::from_millis(200)) {
//!     SessionAction::Committed(steps) => println!("new model: {} steps", steps.len()),
//!     other => println!("no commit: {:?}", other),
//! }
//! ```

pub mod error;
pub mod graph;
pub mod layout;
pub mod model;
pub mod prelude;
pub mod projector;
pub mod reconstructor;
pub mod session;
