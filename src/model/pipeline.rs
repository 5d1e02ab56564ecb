use super::header::ContextHeader;
use super::step::Step;
use serde::{Deserialize, Serialize};

/// The step model of one route or named pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<ContextHeader>,
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            header: None,
            steps,
        }
    }

    pub fn route(method: impl Into<String>, path: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            header: Some(ContextHeader::route(method, path)),
            steps,
        }
    }

    pub fn named(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            header: Some(ContextHeader::pipeline(name)),
            steps,
        }
    }

    pub fn with_header(mut self, header: ContextHeader) -> Self {
        self.header = Some(header);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
