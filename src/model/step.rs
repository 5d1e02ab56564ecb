use super::branch::{BranchCategory, format_branch_label, parse_branch_label};
use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// A single operation in a pipeline.
///
/// The `id` is the step's stable identity: it becomes the visual node id and
/// survives every edit cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(flatten)]
    pub kind: StepKind,
}

/// The two shapes a step can take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum StepKind {
    /// A typed operation carrying source code.
    Regular(RegularStep),
    /// A branching terminator. Holds no source code of its own.
    Result(ResultStep),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegularStep {
    pub operation_type: String,
    /// Display hint for the code editor, derived from `operation_type`.
    pub language: String,
    pub source_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResultStep {
    pub branches: Vec<Branch>,
}

/// One outcome arm of a result block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    /// `"<category>(<code>)"`, e.g. `"ok(200)"`.
    pub branch_label: String,
    pub status_code: u16,
    pub steps: Vec<Step>,
}

impl Step {
    pub fn regular(
        id: impl Into<String>,
        operation_type: impl Into<String>,
        language: impl Into<String>,
        source_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: StepKind::Regular(RegularStep {
                operation_type: operation_type.into(),
                language: language.into(),
                source_code: source_code.into(),
                last_output: None,
            }),
        }
    }

    pub fn result(id: impl Into<String>, branches: Vec<Branch>) -> Self {
        Self {
            id: id.into(),
            kind: StepKind::Result(ResultStep { branches }),
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        if let StepKind::Regular(regular) = &mut self.kind {
            regular.last_output = Some(output.into());
        }
        self
    }

    pub fn is_result(&self) -> bool {
        matches!(self.kind, StepKind::Result(_))
    }

    /// The operation tag; result blocks report `"result"`.
    pub fn operation_type(&self) -> &str {
        match &self.kind {
            StepKind::Regular(regular) => &regular.operation_type,
            StepKind::Result(_) => "result",
        }
    }

    pub fn source_code(&self) -> Option<&str> {
        match &self.kind {
            StepKind::Regular(regular) => Some(&regular.source_code),
            StepKind::Result(_) => None,
        }
    }

    /// Branches of a result block, empty for regular steps.
    pub fn branches(&self) -> &[Branch] {
        match &self.kind {
            StepKind::Regular(_) => &[],
            StepKind::Result(result) => &result.branches,
        }
    }

    pub fn branches_mut(&mut self) -> Option<&mut Vec<Branch>> {
        match &mut self.kind {
            StepKind::Regular(_) => None,
            StepKind::Result(result) => Some(&mut result.branches),
        }
    }
}

impl Branch {
    pub fn new(id: impl Into<String>, category: BranchCategory, status_code: u16) -> Self {
        Self {
            id: id.into(),
            branch_label: format_branch_label(&category, status_code),
            status_code,
            steps: Vec::new(),
        }
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Parses the category out of the branch label.
    pub fn category(&self) -> Result<BranchCategory, ModelError> {
        parse_branch_label(&self.branch_label).map(|(category, _)| category)
    }
}
