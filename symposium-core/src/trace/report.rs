//! Finished traces and their aggregated metrics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cost::LLMCostCalculator;
use super::span::{Span, SpanType};
use crate::llm::{ModelInfo, TokenUsage};

/// Aggregated metrics for one trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    /// Total spans recorded
    pub total_spans: usize,
    /// Spans of type `llm`
    pub llm_calls: usize,
    /// Spans of type `tool`
    pub tool_calls: usize,
    /// Spans that ended with an error
    pub failed_spans: usize,
    /// Total prompt tokens
    pub prompt_tokens: usize,
    /// Total completion tokens
    pub completion_tokens: usize,
    /// Total tokens
    pub total_tokens: usize,
    /// Estimated cost in USD
    pub estimated_cost_usd: f64,
}

impl TraceSummary {
    /// Create an empty summary
    pub fn empty() -> Self {
        Self {
            total_spans: 0,
            llm_calls: 0,
            tool_calls: 0,
            failed_spans: 0,
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens: 0,
            estimated_cost_usd: 0.0,
        }
    }

    /// Summarize a set of spans, pricing tokens against `model_info` when known
    pub fn from_spans(
        spans: &[Span],
        calculator: &LLMCostCalculator,
        model_info: Option<&ModelInfo>,
    ) -> Self {
        let mut summary = Self::empty();

        for span in spans {
            summary.total_spans += 1;
            match span.span_type {
                SpanType::Llm => summary.llm_calls += 1,
                SpanType::Tool => summary.tool_calls += 1,
                SpanType::Function => {}
            }
            if !span.succeeded() {
                summary.failed_spans += 1;
            }
            if let Some(usage) = span.token_usage {
                summary.prompt_tokens += usage.prompt_tokens;
                summary.completion_tokens += usage.completion_tokens;
                summary.total_tokens += usage.total_tokens;
            }
        }

        if let Some(model_info) = model_info {
            summary.estimated_cost_usd =
                calculator.calculate_cost(model_info, &summary.token_usage());
        }

        summary
    }

    pub fn token_usage(&self) -> TokenUsage {
        TokenUsage {
            prompt_tokens: self.prompt_tokens,
            completion_tokens: self.completion_tokens,
            total_tokens: self.total_tokens,
        }
    }

    /// Merge another summary into this one
    pub fn merge(&mut self, other: &TraceSummary) {
        self.total_spans += other.total_spans;
        self.llm_calls += other.llm_calls;
        self.tool_calls += other.tool_calls;
        self.failed_spans += other.failed_spans;
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
        self.estimated_cost_usd += other.estimated_cost_usd;
    }
}

impl Default for TraceSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// One root invocation and every span nested under it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    pub trace_id: String,
    pub project_name: String,
    /// Name of the root span
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
    /// Spans in start order; the root span is first
    pub spans: Vec<Span>,
    pub summary: TraceSummary,
    pub success: bool,
    pub error: Option<String>,
}

impl TraceReport {
    /// The root span
    pub fn root(&self) -> Option<&Span> {
        self.spans.iter().find(|s| s.parent_span_id.is_none())
    }

    /// Spans of the given type
    pub fn spans_of(&self, span_type: SpanType) -> impl Iterator<Item = &Span> {
        self.spans.iter().filter(move |s| s.span_type == span_type)
    }
}

/// Summary across all traces of a run
pub fn merge_summaries<'a>(reports: impl IntoIterator<Item = &'a TraceReport>) -> TraceSummary {
    let mut total = TraceSummary::empty();
    for report in reports {
        total.merge(&report.summary);
    }
    total
}
