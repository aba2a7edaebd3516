//! Evaluation examples

use serde::{Deserialize, Serialize};

/// One input/output pair to be scored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub example_id: String,
    pub input: String,
    pub actual_output: String,
    /// Source passages the output should be grounded in
    #[serde(default)]
    pub retrieval_context: Vec<String>,
}

impl Example {
    pub fn new(input: impl Into<String>, actual_output: impl Into<String>) -> Self {
        Self {
            example_id: uuid::Uuid::new_v4().to_string(),
            input: input.into(),
            actual_output: actual_output.into(),
            retrieval_context: Vec::new(),
        }
    }

    pub fn with_retrieval_context(mut self, context: Vec<String>) -> Self {
        self.retrieval_context = context;
        self
    }
}
