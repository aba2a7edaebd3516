//! # Symposium
//!
//! A multi-agent research pipeline. A lead agent breaks a question into
//! subtopics, research agents investigate each one, and the lead agent
//! synthesizes their findings into a report. Every agent invocation is
//! recorded as a trace and submitted to Judgment Labs, which also scores
//! the final report.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use symposium_core::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = SymposiumConfig::load()?;
//!     let runner = Runner::from_env(config, RunOptions::default())?;
//!
//!     let outcome = runner.run_default().await;
//!     println!("{}", outcome.report.final_synthesis);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: layered configuration and credentials
//! - [`llm`]: chat completion providers and retry
//! - [`trace`]: spans, traces and trace sinks
//! - [`judgment`]: Judgment API client
//! - [`research`]: planner, research and synthesis agents
//! - [`runner`]: the end-to-end pipeline

pub mod config;
pub mod error;
pub mod judgment;
pub mod llm;
pub mod research;
pub mod runner;
pub mod trace;

pub use error::{Result, SymposiumError};

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ApiKey, Credentials, SymposiumConfig, DEFAULT_QUESTION};
    pub use crate::error::{Result, SymposiumError};
    pub use crate::judgment::{
        EvaluationRequest, EvaluationService, Example, JudgmentClient, ScorerConfig,
        ScoringResult,
    };
    pub use crate::llm::{
        LLMProvider, LLMRequest, LLMResponse, Message, MessageRole, ModelInfo, OpenAIProvider,
        RetryConfig, TokenUsage,
    };
    pub use crate::research::{
        AgentRole, EvaluationSummary, Finding, LeadAgent, MockSearch, ResearchAgent,
        ResearchReport, ResearchStore, SearchResults, SearchTool,
    };
    pub use crate::runner::{RunOptions, RunOutcome, Runner};
    pub use crate::trace::{
        FanoutSink, JsonFileSink, MemorySink, NullSink, SpanType, TraceExporter, TraceFormat,
        TraceReport, TraceSink, TraceSummary, TracedProvider, Tracer,
    };
}
