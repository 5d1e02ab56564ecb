use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;

/// Geometry constants for node sizing and the initial projection layout.
///
/// Every field has a default, so a JSON file only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_width: f64,
    pub context_node_height: f64,
    /// Vertical gap between consecutive main-line nodes.
    pub step_gap: f64,

    // Regular step boxes
    pub line_height: f64,
    pub box_padding: f64,
    pub min_code_height: f64,
    pub max_code_height: f64,
    pub min_output_height: f64,
    pub max_output_height: f64,
    pub header_height: f64,
    pub footer_height: f64,

    // Result blocks
    pub result_base_height: f64,
    pub result_branch_row_height: f64,
    pub result_empty_extra: f64,
    pub result_bottom_padding: f64,

    // Branch fan-out
    pub branch_offset_x: f64,
    pub branch_step_gap_x: f64,
    pub branch_offset_y: f64,
    pub inter_branch_gap: f64,
    pub branch_trailing_gap: f64,

    // Hierarchical auto-layout
    pub rank_separation: f64,
    pub node_separation: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 350.0,
            context_node_height: 60.0,
            step_gap: 50.0,
            line_height: 18.0,
            box_padding: 20.0,
            min_code_height: 60.0,
            max_code_height: 300.0,
            min_output_height: 40.0,
            max_output_height: 150.0,
            header_height: 40.0,
            footer_height: 10.0,
            result_base_height: 60.0,
            result_branch_row_height: 42.0,
            result_empty_extra: 40.0,
            result_bottom_padding: 20.0,
            branch_offset_x: 150.0,
            branch_step_gap_x: 50.0,
            branch_offset_y: 50.0,
            inter_branch_gap: 100.0,
            branch_trailing_gap: 100.0,
            rank_separation: 50.0,
            node_separation: 100.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load layout overrides from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
