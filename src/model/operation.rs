use super::branch::BranchCategory;
use super::step::{Branch, Step};
use crate::error::ModelError;
use ahash::AHashMap;

/// The operation type name that creates a result block instead of a regular step.
pub const RESULT_OPERATION: &str = "result";

/// A step type the editor can create.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operation_type: String,
    pub language: String,
    pub default_code: String,
}

impl Operation {
    pub fn new(
        operation_type: impl Into<String>,
        language: impl Into<String>,
        default_code: impl Into<String>,
    ) -> Self {
        Self {
            operation_type: operation_type.into(),
            language: language.into(),
            default_code: default_code.into(),
        }
    }
}

/// Defines the built-in operations together with their language and
/// default-code lookups.
macro_rules! define_operations {
    ( $( ($op_type:literal, $language:literal, $default_code:expr) ),* $(,)? ) => {
        /// Fixed lookup from operation type to editor language. Unknown types map to `"text"`.
        pub fn language_for_type(operation_type: &str) -> &'static str {
            match operation_type {
                $( $op_type => $language, )*
                _ => "text",
            }
        }

        /// Starter source for a freshly added step. Unknown types start empty.
        pub fn default_code_for_type(operation_type: &str) -> &'static str {
            match operation_type {
                $( $op_type => $default_code, )*
                _ => "",
            }
        }

        fn default_operations() -> Vec<Operation> {
            vec![ $( Operation::new($op_type, $language, $default_code), )* ]
        }
    };
}

define_operations! {
    ("curl", "shell", "curl -s \"https://api.example.com/data\""),
    // no jq grammar in the editor
    ("jq", "text", ". | { transformed: .data }"),
    ("lua", "lua", "return { message = \"Hello from Lua!\" }"),
    ("handlebars", "handlebars", "<h1>{{title}}</h1>"),
    ("pg", "sql", "SELECT * FROM users LIMIT 10"),
    ("auth", "yaml", ""),
    ("validate", "json", ""),
    ("cache", "yaml", ""),
    ("log", "yaml", ""),
}

/// The set of operations a user may add to a pipeline, in menu order.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    operations: Vec<Operation>,
    index: AHashMap<String, usize>,
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            operations: Vec::new(),
            index: AHashMap::new(),
        };
        for operation in default_operations() {
            registry.insert(operation);
        }
        registry
    }

    /// Registers an additional operation, replacing any with the same type.
    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.insert(operation);
        self
    }

    fn insert(&mut self, operation: Operation) {
        match self.index.get(&operation.operation_type) {
            Some(&slot) => self.operations[slot] = operation,
            None => {
                self.index
                    .insert(operation.operation_type.clone(), self.operations.len());
                self.operations.push(operation);
            }
        }
    }

    pub fn get(&self, operation_type: &str) -> Option<&Operation> {
        self.index.get(operation_type).map(|&i| &self.operations[i])
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Language for a type, preferring registered operations over the fixed table.
    pub fn language_of(&self, operation_type: &str) -> String {
        self.get(operation_type)
            .map(|op| op.language.clone())
            .unwrap_or_else(|| language_for_type(operation_type).to_string())
    }

    /// Builds a new step of the given type with its starter code.
    ///
    /// `"result"` yields a result block with an empty `ok(200)` and `error(500)` branch.
    pub fn create_step(&self, operation_type: &str, id: &str) -> Result<Step, ModelError> {
        if operation_type == RESULT_OPERATION {
            return Ok(Step::result(
                id,
                vec![
                    Branch::new(format!("{}-branch-0", id), BranchCategory::Ok, 200),
                    Branch::new(format!("{}-branch-1", id), BranchCategory::Error, 500),
                ],
            ));
        }

        let operation = self
            .get(operation_type)
            .ok_or_else(|| ModelError::UnknownOperation(operation_type.to_string()))?;
        Ok(Step::regular(
            id,
            operation.operation_type.clone(),
            operation.language.clone(),
            operation.default_code.clone(),
        )
        .with_output(""))
    }
}
