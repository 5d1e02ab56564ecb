use serde::{Deserialize, Serialize};

/// Display-only root of the graph: the route or named pipeline being edited.
/// Never part of the step list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContextHeader {
    Route { method: String, path: String },
    Pipeline { name: String },
}

impl ContextHeader {
    pub fn route(method: impl Into<String>, path: impl Into<String>) -> Self {
        ContextHeader::Route {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn pipeline(name: impl Into<String>) -> Self {
        ContextHeader::Pipeline { name: name.into() }
    }

    /// The fixed id of the synthetic context node.
    pub fn node_id(&self) -> &'static str {
        match self {
            ContextHeader::Route { .. } => "route-node",
            ContextHeader::Pipeline { .. } => "pipeline-node",
        }
    }

    pub fn title(&self) -> String {
        match self {
            ContextHeader::Route { method, path } => format!("{} {}", method, path),
            ContextHeader::Pipeline { name } => format!("pipeline {}", name),
        }
    }
}
