//! Span recording and trace assembly.
//!
//! The tracer keeps a stack of open spans. A span opened while the stack is
//! empty starts a new trace; closing that root span finalizes the trace and
//! hands it to the sink. Calls are expected to nest, one at a time.

use chrono::Utc;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use super::cost::LLMCostCalculator;
use super::report::{TraceReport, TraceSummary};
use super::sink::TraceSink;
use super::span::{Span, SpanOutcome, SpanType};
use crate::error::Result;
use crate::llm::ModelInfo;

/// Generate a unique trace or span id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Handle for an open span; pass it back to [`Tracer::close_span`]
#[derive(Debug)]
#[must_use = "an open span must be closed"]
pub struct SpanHandle {
    span_id: String,
    trace_id: String,
    started: Instant,
}

impl SpanHandle {
    pub fn span_id(&self) -> &str {
        &self.span_id
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }
}

struct ActiveTrace {
    trace_id: String,
    name: String,
    started_at: chrono::DateTime<Utc>,
    started: Instant,
    /// Ids of open spans, innermost last
    stack: Vec<String>,
    spans: Vec<Span>,
}

#[derive(Default)]
struct TracerState {
    active: Option<ActiveTrace>,
    completed: Vec<TraceReport>,
}

/// Records spans and submits one report per root invocation
pub struct Tracer {
    project_name: String,
    sink: Arc<dyn TraceSink>,
    model_info: Option<ModelInfo>,
    cost_calculator: LLMCostCalculator,
    state: Mutex<TracerState>,
}

impl Tracer {
    pub fn new(project_name: impl Into<String>, sink: Arc<dyn TraceSink>) -> Self {
        Self {
            project_name: project_name.into(),
            sink,
            model_info: None,
            cost_calculator: LLMCostCalculator::new(),
            state: Mutex::new(TracerState::default()),
        }
    }

    /// Price token usage against this model
    pub fn with_model(mut self, model_info: ModelInfo) -> Self {
        self.model_info = Some(model_info);
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TracerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a span under the innermost open span, or start a new trace.
    pub fn start_span(
        &self,
        name: impl Into<String>,
        span_type: SpanType,
        inputs: serde_json::Value,
    ) -> SpanHandle {
        let name = name.into();
        let span_id = generate_id();
        let mut state = self.lock();

        let active = state.active.get_or_insert_with(|| ActiveTrace {
            trace_id: generate_id(),
            name: name.clone(),
            started_at: Utc::now(),
            started: Instant::now(),
            stack: Vec::new(),
            spans: Vec::new(),
        });

        tracing::debug!(
            trace_id = %active.trace_id,
            span = %name,
            span_type = %span_type,
            depth = active.stack.len(),
            "Span started"
        );

        active.spans.push(Span {
            span_id: span_id.clone(),
            trace_id: active.trace_id.clone(),
            parent_span_id: active.stack.last().cloned(),
            name,
            span_type,
            depth: active.stack.len(),
            inputs,
            output: None,
            error: None,
            started_at: Utc::now(),
            duration_ms: 0,
            token_usage: None,
        });
        active.stack.push(span_id.clone());

        SpanHandle {
            span_id,
            trace_id: active.trace_id.clone(),
            started: Instant::now(),
        }
    }

    /// Close a span. Returns the finished report when it was the root.
    fn end_span(&self, handle: SpanHandle, outcome: SpanOutcome) -> Option<TraceReport> {
        let mut state = self.lock();

        let active = match state.active.as_mut() {
            Some(active) if active.trace_id == handle.trace_id => active,
            _ => {
                tracing::warn!(
                    span_id = %handle.span_id,
                    "Closing span of a trace that is no longer active"
                );
                return None;
            }
        };

        if let Some(span) = active.spans.iter_mut().find(|s| s.span_id == handle.span_id) {
            span.duration_ms = handle.started.elapsed().as_millis() as u64;
            span.output = outcome.output;
            span.error = outcome.error;
            span.token_usage = outcome.token_usage;
        }

        if let Some(pos) = active.stack.iter().rposition(|id| *id == handle.span_id) {
            active.stack.truncate(pos);
        }

        if !active.stack.is_empty() {
            return None;
        }

        let active = state.active.take()?;
        let report = self.finalize(active);
        state.completed.push(report.clone());
        Some(report)
    }

    fn finalize(&self, active: ActiveTrace) -> TraceReport {
        let summary = TraceSummary::from_spans(
            &active.spans,
            &self.cost_calculator,
            self.model_info.as_ref(),
        );
        let error = active
            .spans
            .iter()
            .find(|s| s.parent_span_id.is_none())
            .and_then(|root| root.error.clone());

        TraceReport {
            trace_id: active.trace_id,
            project_name: self.project_name.clone(),
            name: active.name,
            started_at: active.started_at,
            completed_at: Utc::now(),
            duration_ms: active.started.elapsed().as_millis() as u64,
            spans: active.spans,
            summary,
            success: error.is_none(),
            error,
        }
    }

    /// Close a span, submitting the trace when the root closes.
    ///
    /// Submission failures are logged and do not propagate.
    pub async fn close_span(&self, handle: SpanHandle, outcome: SpanOutcome) {
        let Some(report) = self.end_span(handle, outcome) else {
            return;
        };

        tracing::debug!(
            trace_id = %report.trace_id,
            name = %report.name,
            spans = report.spans.len(),
            sink = self.sink.name(),
            "Submitting trace"
        );

        if let Err(e) = self.sink.submit(&report).await {
            tracing::warn!(
                trace_id = %report.trace_id,
                name = %report.name,
                sink = self.sink.name(),
                error = %e,
                "Failed to submit trace"
            );
        }
    }

    /// Record a span around `operation`.
    ///
    /// The success value is serialized as the span output; an error is
    /// recorded as the span error and returned unchanged.
    pub async fn observe<T, F>(
        &self,
        name: &str,
        span_type: SpanType,
        inputs: serde_json::Value,
        operation: F,
    ) -> Result<T>
    where
        T: Serialize,
        F: Future<Output = Result<T>>,
    {
        let handle = self.start_span(name, span_type, inputs);
        let result = operation.await;

        let outcome = match &result {
            Ok(value) => SpanOutcome::ok(
                serde_json::to_value(value).unwrap_or(serde_json::Value::Null),
            ),
            Err(e) => SpanOutcome::failed(e.to_string()),
        };
        self.close_span(handle, outcome).await;

        result
    }

    /// Every trace finalized so far, in completion order
    pub fn completed_traces(&self) -> Vec<TraceReport> {
        self.lock().completed.clone()
    }

    /// Whether a trace is currently open
    pub fn in_trace(&self) -> bool {
        self.lock().active.is_some()
    }
}
