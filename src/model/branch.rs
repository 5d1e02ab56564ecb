use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome category of a result branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name")]
pub enum BranchCategory {
    Ok,
    Error,
    Custom(String),
}

impl BranchCategory {
    pub fn from_name(name: &str) -> Self {
        match name {
            "ok" => BranchCategory::Ok,
            "error" => BranchCategory::Error,
            other => BranchCategory::Custom(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BranchCategory::Ok => "ok",
            BranchCategory::Error => "error",
            BranchCategory::Custom(name) => name,
        }
    }
}

impl fmt::Display for BranchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits `"<category>(<code>)"` into its parts.
pub fn parse_branch_label(label: &str) -> Result<(BranchCategory, u16), ModelError> {
    let invalid = || ModelError::InvalidBranchLabel(label.to_string());

    let (name, rest) = label.split_once('(').ok_or_else(invalid)?;
    let digits = rest.strip_suffix(')').ok_or_else(invalid)?;
    if name.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let code = digits.parse::<u16>().map_err(|_| invalid())?;
    Ok((BranchCategory::from_name(name), code))
}

pub fn format_branch_label(category: &BranchCategory, status_code: u16) -> String {
    format!("{}({})", category, status_code)
}
