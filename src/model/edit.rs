//! In-place edits of a step tree, used by the editing surface callbacks.
//!
//! Every lookup walks the whole tree: top-level steps first, then each result
//! block's branches in order.

use super::step::{Step, StepKind};
use crate::error::ModelError;

pub fn find_step<'a>(steps: &'a [Step], id: &str) -> Option<&'a Step> {
    for step in steps {
        if step.id == id {
            return Some(step);
        }
        for branch in step.branches() {
            if let Some(found) = find_step(&branch.steps, id) {
                return Some(found);
            }
        }
    }
    None
}

fn find_step_mut<'a>(steps: &'a mut [Step], id: &str) -> Option<&'a mut Step> {
    for step in steps.iter_mut() {
        if step.id == id {
            return Some(step);
        }
        if let Some(branches) = step.branches_mut() {
            for branch in branches.iter_mut() {
                if let Some(found) = find_step_mut(&mut branch.steps, id) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Replaces the source code of a regular step.
pub fn update_code(steps: &mut [Step], id: &str, source_code: &str) -> Result<(), ModelError> {
    let step = find_step_mut(steps, id).ok_or_else(|| ModelError::StepNotFound(id.to_string()))?;
    match &mut step.kind {
        StepKind::Regular(regular) => {
            regular.source_code = source_code.to_string();
            Ok(())
        }
        StepKind::Result(_) => Err(ModelError::NotARegularStep(id.to_string())),
    }
}

/// Appends a step at the end of the top-level list.
pub fn insert_step(steps: &mut Vec<Step>, step: Step) {
    steps.push(step);
}

/// Appends a step to the `index`-th branch of the result block `result_id`.
pub fn insert_into_branch(
    steps: &mut [Step],
    result_id: &str,
    index: usize,
    step: Step,
) -> Result<(), ModelError> {
    let result = find_step_mut(steps, result_id)
        .ok_or_else(|| ModelError::StepNotFound(result_id.to_string()))?;
    let branches = result
        .branches_mut()
        .ok_or_else(|| ModelError::BranchIndexOutOfRange {
            step_id: result_id.to_string(),
            index,
        })?;
    let branch = branches
        .get_mut(index)
        .ok_or_else(|| ModelError::BranchIndexOutOfRange {
            step_id: result_id.to_string(),
            index,
        })?;
    branch.steps.push(step);
    Ok(())
}

/// Removes a step wherever it lives in the tree and returns it.
pub fn delete_step(steps: &mut Vec<Step>, id: &str) -> Result<Step, ModelError> {
    remove_recursive(steps, id).ok_or_else(|| ModelError::StepNotFound(id.to_string()))
}

fn remove_recursive(steps: &mut Vec<Step>, id: &str) -> Option<Step> {
    if let Some(pos) = steps.iter().position(|s| s.id == id) {
        return Some(steps.remove(pos));
    }
    for step in steps.iter_mut() {
        if let Some(branches) = step.branches_mut() {
            for branch in branches.iter_mut() {
                if let Some(removed) = remove_recursive(&mut branch.steps, id) {
                    return Some(removed);
                }
            }
        }
    }
    None
}

/// Collects every step id in the tree, depth-first.
pub fn collect_ids(steps: &[Step], out: &mut Vec<String>) {
    for step in steps {
        out.push(step.id.clone());
        for branch in step.branches() {
            collect_ids(&branch.steps, out);
        }
    }
}
