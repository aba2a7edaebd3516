//! Span records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::TokenUsage;

/// Kind of observed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanType {
    /// A call to the language model
    Llm,
    /// A tool invocation (search, storage)
    Tool,
    /// An agent or plain function
    Function,
}

impl std::fmt::Display for SpanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SpanType::Llm => "llm",
            SpanType::Tool => "tool",
            SpanType::Function => "function",
        };
        f.write_str(s)
    }
}

/// One observed operation inside a trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    pub span_id: String,
    pub trace_id: String,
    pub parent_span_id: Option<String>,
    pub name: String,
    pub span_type: SpanType,
    /// Nesting depth; the root span is 0
    pub depth: usize,
    pub inputs: serde_json::Value,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub token_usage: Option<TokenUsage>,
}

impl Span {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// How a span ended
#[derive(Debug, Clone, Default)]
pub struct SpanOutcome {
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
    pub token_usage: Option<TokenUsage>,
}

impl SpanOutcome {
    pub fn ok(output: serde_json::Value) -> Self {
        Self {
            output: Some(output),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.token_usage = usage;
        self
    }
}
