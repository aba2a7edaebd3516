//! Research agents
//!
//! The lead agent plans subtopics, one research agent handles each subtopic
//! in turn, and the lead agent synthesizes their findings.

pub mod agent;
pub mod evaluate;
pub mod lead;
pub mod plan;
pub mod report;
pub mod role;
pub mod search;
pub mod store;

pub use agent::ResearchAgent;
pub use evaluate::{evaluate_research_quality, EvaluationSummary};
pub use lead::LeadAgent;
pub use plan::parse_subtopics;
pub use report::{Finding, ResearchReport, ABORTED_SUBTOPIC};
pub use role::AgentRole;
pub use search::{MockSearch, SearchResults, SearchTool};
pub use store::ResearchStore;
