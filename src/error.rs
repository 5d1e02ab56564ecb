use crate::graph::NodeKind;
use thiserror::Error;

/// Errors raised by edits against the step model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Step '{0}' was not found in the pipeline")]
    StepNotFound(String),

    #[error("Operation type '{0}' is not registered")]
    UnknownOperation(String),

    #[error("Branch label '{0}' is not of the form '<category>(<code>)'")]
    InvalidBranchLabel(String),

    #[error("Result step '{step_id}' has no branch at index {index}")]
    BranchIndexOutOfRange { step_id: String, index: usize },

    #[error("Step '{0}' is a result block and has no source code")]
    NotARegularStep(String),
}

/// Errors that can occur while rebuilding a step model from a visual graph.
///
/// Broken connectivity (dangling edges, cycles, orphans) is never an error;
/// only a node whose payload contradicts its declared kind is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconstructError {
    #[error("Node '{node_id}' is declared as {kind:?} but carries a {found} payload")]
    PayloadMismatch {
        node_id: String,
        kind: NodeKind,
        found: &'static str,
    },
}

/// Errors that can occur when converting a parser document into a pipeline.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    #[error("Invalid document data: {0}")]
    ValidationError(String),

    #[error("Failed to parse document JSON: {0}")]
    Json(String),
}

/// Errors that can occur while loading layout or session configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
