//! Remote scorer selection

use serde::{Deserialize, Serialize};

/// Scorers run by the evaluation service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Whether the output is supported by the retrieval context
    Faithfulness,
    /// Whether the output addresses the input
    AnswerRelevancy,
}

impl ScorerKind {
    /// Display name, as reported back in scoring results
    pub fn display_name(&self) -> &'static str {
        match self {
            ScorerKind::Faithfulness => "Faithfulness",
            ScorerKind::AnswerRelevancy => "Answer Relevancy",
        }
    }
}

/// A scorer and its pass threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerConfig {
    pub score_type: ScorerKind,
    pub threshold: f64,
}

impl ScorerConfig {
    pub fn faithfulness(threshold: f64) -> Self {
        Self {
            score_type: ScorerKind::Faithfulness,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn answer_relevancy(threshold: f64) -> Self {
        Self {
            score_type: ScorerKind::AnswerRelevancy,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.score_type.display_name()
    }
}
