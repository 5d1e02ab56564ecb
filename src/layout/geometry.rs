use super::config::LayoutConfig;
use crate::model::{Step, StepKind};

/// Number of display lines; empty text still occupies one line.
pub fn line_count(text: &str) -> usize {
    text.split('\n').count()
}

fn clamped_box_height(config: &LayoutConfig, lines: usize, min: f64, max: f64) -> f64 {
    let natural = lines as f64 * config.line_height + config.box_padding;
    min.max(max.min(natural))
}

pub fn code_box_height(config: &LayoutConfig, source_code: &str) -> f64 {
    clamped_box_height(
        config,
        line_count(source_code),
        config.min_code_height,
        config.max_code_height,
    )
}

pub fn output_box_height(config: &LayoutConfig, output: Option<&str>) -> f64 {
    clamped_box_height(
        config,
        line_count(output.unwrap_or_default()),
        config.min_output_height,
        config.max_output_height,
    )
}

/// Height of a result block, driven by how many branches it has.
pub fn result_node_height(config: &LayoutConfig, branch_count: usize) -> f64 {
    if branch_count == 0 {
        return config.result_base_height + config.result_empty_extra;
    }
    config.result_base_height
        + branch_count as f64 * config.result_branch_row_height
        + config.result_bottom_padding
}

/// Visual height of the node that renders `step`.
pub fn step_node_height(config: &LayoutConfig, step: &Step) -> f64 {
    match &step.kind {
        StepKind::Regular(regular) => {
            config.header_height
                + code_box_height(config, &regular.source_code)
                + output_box_height(config, regular.last_output.as_deref())
                + config.footer_height
        }
        StepKind::Result(result) => result_node_height(config, result.branches.len()),
    }
}
