use super::branch::{BranchCategory, format_branch_label, parse_branch_label};
use super::operation::OperationRegistry;
use super::pipeline::Pipeline;
use super::step::{Branch, Step, StepKind};
use crate::error::ConversionError;
use serde::{Deserialize, Serialize};

// --- Parser Document Structs ---
// These mirror the step JSON produced and consumed by the WebPipe parser/printer.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DocumentStep {
    Regular {
        name: String,
        config: String,
        #[serde(rename = "configType", default)]
        config_type: ConfigType,
    },
    Result {
        branches: Vec<DocumentBranch>,
    },
}

/// How the printer should render a regular step's config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigType {
    #[default]
    Backtick,
    Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBranch {
    pub branch_type: BranchCategory,
    pub status_code: u16,
    pub pipeline: DocumentSteps,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentSteps {
    pub steps: Vec<DocumentStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRoute {
    pub method: String,
    pub path: String,
    pub pipeline: DocumentSteps,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPipeline {
    pub name: String,
    pub pipeline: DocumentSteps,
}

/// A trait for parsed source structures that can be turned into an editable [`Pipeline`].
///
/// This is the seam between the external parser and the flow engine. Implement it
/// for any other document shape to feed it into the projector.
pub trait IntoPipeline: Sized {
    /// Converts into a step model with a context header, taking each step's
    /// editor language from `registry`.
    fn into_pipeline_with(self, registry: &OperationRegistry) -> Result<Pipeline, ConversionError>;

    /// Consumes the object and converts it using the built-in operations.
    fn into_pipeline(self) -> Result<Pipeline, ConversionError> {
        self.into_pipeline_with(&OperationRegistry::new())
    }
}

impl IntoPipeline for DocumentRoute {
    fn into_pipeline_with(self, registry: &OperationRegistry) -> Result<Pipeline, ConversionError> {
        if self.method.trim().is_empty() {
            return Err(ConversionError::ValidationError(format!(
                "route '{}' has no method",
                self.path
            )));
        }
        let prefix = format!("{}-{}", self.method, self.path);
        let steps = steps_from_document(&self.pipeline.steps, &prefix, registry);
        Ok(Pipeline::route(self.method, self.path, steps))
    }
}

impl IntoPipeline for DocumentPipeline {
    fn into_pipeline_with(self, registry: &OperationRegistry) -> Result<Pipeline, ConversionError> {
        if self.name.trim().is_empty() {
            return Err(ConversionError::ValidationError(
                "pipeline has an empty name".to_string(),
            ));
        }
        let prefix = format!("pipeline-{}", self.name);
        let steps = steps_from_document(&self.pipeline.steps, &prefix, registry);
        Ok(Pipeline::named(self.name, steps))
    }
}

impl DocumentRoute {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::Json(e.to_string()))
    }
}

impl DocumentPipeline {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::Json(e.to_string()))
    }
}

/// Builds a step model from parser steps, assigning ids that stay stable across reparses
/// of the same source.
pub fn steps_from_document(
    doc_steps: &[DocumentStep],
    prefix: &str,
    registry: &OperationRegistry,
) -> Vec<Step> {
    doc_steps
        .iter()
        .enumerate()
        .map(|(i, doc_step)| {
            let id = format!("{}-{}", prefix, i);
            match doc_step {
                DocumentStep::Regular { name, config, .. } => {
                    Step::regular(id, name.clone(), registry.language_of(name), config.clone())
                }
                DocumentStep::Result { branches } => {
                    let branches = branches
                        .iter()
                        .enumerate()
                        .map(|(k, doc_branch)| {
                            let branch_id = format!("{}-branch-{}", id, k);
                            let steps =
                                steps_from_document(&doc_branch.pipeline.steps, &branch_id, registry);
                            Branch {
                                branch_label: format_branch_label(
                                    &doc_branch.branch_type,
                                    doc_branch.status_code,
                                ),
                                status_code: doc_branch.status_code,
                                id: branch_id,
                                steps,
                            }
                        })
                        .collect();
                    Step::result(id, branches)
                }
            }
        })
        .collect()
}

/// Converts a step model back into parser steps for printing.
pub fn steps_to_document(steps: &[Step]) -> Vec<DocumentStep> {
    steps
        .iter()
        .map(|step| match &step.kind {
            StepKind::Regular(regular) => DocumentStep::Regular {
                name: regular.operation_type.clone(),
                config: regular.source_code.clone(),
                config_type: config_type_for(&regular.operation_type, &regular.source_code),
            },
            StepKind::Result(result) => DocumentStep::Result {
                branches: result
                    .branches
                    .iter()
                    .map(|branch| {
                        let (branch_type, status_code) = parse_branch_label(&branch.branch_label)
                            .unwrap_or((BranchCategory::Ok, 200));
                        DocumentBranch {
                            branch_type,
                            status_code,
                            pipeline: DocumentSteps {
                                steps: steps_to_document(&branch.steps),
                            },
                        }
                    })
                    .collect(),
            },
        })
        .collect()
}

fn config_type_for(operation_type: &str, source_code: &str) -> ConfigType {
    if operation_type == "pipeline" || is_identifier(source_code.trim()) {
        ConfigType::Identifier
    } else {
        ConfigType::Backtick
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
