//! Execution tracing
//!
//! Every agent invocation becomes one trace made of nested spans (agent,
//! tools, LLM calls). Finished traces are summarized, priced and handed to a
//! [`TraceSink`].

pub mod cost;
pub mod export;
pub mod report;
pub mod sink;
pub mod span;
pub mod traced;
pub mod tracer;

pub use cost::LLMCostCalculator;
pub use export::{TraceExporter, TraceFormat};
pub use report::{merge_summaries, TraceReport, TraceSummary};
pub use sink::{FanoutSink, JsonFileSink, MemorySink, NullSink, TraceSink};
pub use span::{Span, SpanOutcome, SpanType};
pub use traced::TracedProvider;
pub use tracer::{generate_id, SpanHandle, Tracer};
