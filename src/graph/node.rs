use crate::model::{Branch, ContextHeader, Step};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The rendering role of a visual node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Context,
    RegularStep,
    ResultStep,
    BranchStep,
}

impl NodeKind {
    /// Main-line nodes take part in the top-level pipeline order.
    pub fn is_main_line(self) -> bool {
        matches!(self, NodeKind::RegularStep | NodeKind::ResultStep)
    }
}

/// What a visual node displays.
///
/// Branch membership lives here, on the node, and not on the [`Step`]: it is a
/// property of the current graph arrangement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "camelCase")]
pub enum NodePayload {
    Context {
        header: ContextHeader,
    },
    Step {
        step: Step,
    },
    BranchMember {
        step: Step,
        #[serde(rename = "branchId")]
        branch_id: String,
        /// Label of the owning branch, e.g. `"ok(200)"`.
        #[serde(rename = "branchType")]
        branch_type: String,
    },
}

impl NodePayload {
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            NodePayload::Context { .. } => "context",
            NodePayload::Step { step } if step.is_result() => "result step",
            NodePayload::Step { .. } => "regular step",
            NodePayload::BranchMember { .. } => "branch member",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub size: Size,
    pub data: NodePayload,
}

impl VisualNode {
    pub fn context(header: ContextHeader, position: Position, size: Size) -> Self {
        Self {
            id: header.node_id().to_string(),
            kind: NodeKind::Context,
            position,
            size,
            data: NodePayload::Context { header },
        }
    }

    /// A main-line node; the kind follows the step's shape.
    pub fn main_line(step: Step, position: Position, size: Size) -> Self {
        let kind = if step.is_result() {
            NodeKind::ResultStep
        } else {
            NodeKind::RegularStep
        };
        Self {
            id: step.id.clone(),
            kind,
            position,
            size,
            data: NodePayload::Step { step },
        }
    }

    pub fn branch_member(step: Step, branch: &Branch, position: Position, size: Size) -> Self {
        Self {
            id: step.id.clone(),
            kind: NodeKind::BranchStep,
            position,
            size,
            data: NodePayload::BranchMember {
                step,
                branch_id: branch.id.clone(),
                branch_type: branch.branch_label.clone(),
            },
        }
    }

    pub fn step(&self) -> Option<&Step> {
        match &self.data {
            NodePayload::Context { .. } => None,
            NodePayload::Step { step } | NodePayload::BranchMember { step, .. } => Some(step),
        }
    }

    pub fn step_mut(&mut self) -> Option<&mut Step> {
        match &mut self.data {
            NodePayload::Context { .. } => None,
            NodePayload::Step { step } | NodePayload::BranchMember { step, .. } => Some(step),
        }
    }

    pub fn branch_id(&self) -> Option<&str> {
        match &self.data {
            NodePayload::BranchMember { branch_id, .. } => Some(branch_id),
            _ => None,
        }
    }

    /// Whether the declared kind agrees with the payload variant.
    pub fn is_consistent(&self) -> bool {
        match (self.kind, &self.data) {
            (NodeKind::Context, NodePayload::Context { .. }) => true,
            (NodeKind::RegularStep, NodePayload::Step { step }) => !step.is_result(),
            (NodeKind::ResultStep, NodePayload::Step { step }) => step.is_result(),
            (NodeKind::BranchStep, NodePayload::BranchMember { .. }) => true,
            _ => false,
        }
    }
}
