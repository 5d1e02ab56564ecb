use serde::{Deserialize, Serialize};

/// Source handles of this form leave a result node through one of its branch outputs.
pub const BRANCH_HANDLE_PREFIX: &str = "branch-";
pub const OUTPUT_HANDLE: &str = "output";
pub const INPUT_HANDLE: &str = "input";

pub fn branch_handle(index: usize) -> String {
    format!("{}{}", BRANCH_HANDLE_PREFIX, index)
}

/// Extracts `k` from `"branch-<k>"`.
pub fn parse_branch_handle(handle: &str) -> Option<usize> {
    handle.strip_prefix(BRANCH_HANDLE_PREFIX)?.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl VisualEdge {
    /// A plain main-line connection. The id is derived from the endpoints.
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: format!("{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: None,
            target_handle: None,
        }
    }

    /// A connection between two consecutive steps of the same branch.
    pub fn chained(source: &str, target: &str) -> Self {
        Self {
            source_handle: Some(OUTPUT_HANDLE.to_string()),
            target_handle: Some(INPUT_HANDLE.to_string()),
            ..Self::new(source, target)
        }
    }

    /// A connection leaving `result_id` through its `index`-th branch output.
    pub fn from_branch(result_id: &str, target: &str, index: usize) -> Self {
        Self {
            id: format!("{}-{}-{}", result_id, branch_handle(index), target),
            source: result_id.to_string(),
            target: target.to_string(),
            source_handle: Some(branch_handle(index)),
            target_handle: Some(INPUT_HANDLE.to_string()),
        }
    }

    pub fn is_branch_edge(&self) -> bool {
        self.source_handle
            .as_deref()
            .is_some_and(|h| h.starts_with(BRANCH_HANDLE_PREFIX))
    }

    pub fn branch_index(&self) -> Option<usize> {
        self.source_handle.as_deref().and_then(parse_branch_handle)
    }
}
