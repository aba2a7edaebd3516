//! Judgment Labs integration: trace storage and remote evaluation

pub mod client;
pub mod example;
pub mod result;
pub mod scorer;

pub use client::{EvaluationRequest, EvaluationService, JudgmentClient};
pub use example::Example;
pub use result::{ScorerData, ScoringResult};
pub use scorer::{ScorerConfig, ScorerKind};
