//! Research output types

use serde::{Deserialize, Serialize};

use crate::error::SymposiumError;

/// Sole subtopic of a report whose planning failed
pub const ABORTED_SUBTOPIC: &str = "Error occurred";

/// What one research agent produced for its subtopic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// 1-based position of the agent in the plan
    pub agent_id: usize,
    pub topic: String,
    pub findings: String,
    pub sources: Vec<String>,
    pub search_query: String,
}

impl Finding {
    /// Placeholder finding for an agent that failed
    pub fn failed(agent_id: usize, topic: impl Into<String>, error: &SymposiumError) -> Self {
        let topic = topic.into();
        Self {
            agent_id,
            search_query: topic.clone(),
            topic,
            findings: format!("Research failed: {}", error),
            sources: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.sources.is_empty() && self.findings.starts_with("Research failed: ")
    }
}

/// The final output of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub research_question: String,
    pub subtopics: Vec<String>,
    pub individual_research: Vec<Finding>,
    pub final_synthesis: String,
    pub total_agents_used: usize,
}

impl ResearchReport {
    pub fn new(
        research_question: impl Into<String>,
        subtopics: Vec<String>,
        individual_research: Vec<Finding>,
        final_synthesis: impl Into<String>,
    ) -> Self {
        Self {
            research_question: research_question.into(),
            subtopics,
            total_agents_used: individual_research.len(),
            individual_research,
            final_synthesis: final_synthesis.into(),
        }
    }

    /// Report for a run the lead agent could not carry out
    pub fn aborted(research_question: impl Into<String>, error: &SymposiumError) -> Self {
        Self::new(
            research_question,
            vec![ABORTED_SUBTOPIC.to_string()],
            Vec::new(),
            format!("Research failed due to error: {}", error),
        )
    }

    pub fn is_aborted(&self) -> bool {
        self.individual_research.is_empty() && self.subtopics == [ABORTED_SUBTOPIC]
    }

    /// The findings text of every agent, in plan order
    pub fn retrieval_context(&self) -> Vec<String> {
        self.individual_research
            .iter()
            .map(|f| f.findings.clone())
            .collect()
    }

    pub fn failed_agents(&self) -> usize {
        self.individual_research.iter().filter(|f| f.is_failure()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_finding() {
        let err = SymposiumError::Http("connection refused".to_string());
        let finding = Finding::failed(2, "Economic factors", &err);

        assert_eq!(finding.agent_id, 2);
        assert_eq!(finding.search_query, "Economic factors");
        assert_eq!(finding.findings, "Research failed: HTTP error: connection refused");
        assert!(finding.is_failure());
    }

    #[test]
    fn test_report_counts_agents() {
        let ok = Finding {
            agent_id: 1,
            topic: "Solar".to_string(),
            findings: "Cheap".to_string(),
            sources: vec!["source1.com".to_string()],
            search_query: "Solar research analysis".to_string(),
        };
        let failed = Finding::failed(2, "Wind", &SymposiumError::Agent("x".to_string()));
        let report = ResearchReport::new("q", vec![], vec![ok, failed], "synthesis");

        assert_eq!(report.total_agents_used, 2);
        assert_eq!(report.failed_agents(), 1);
        assert_eq!(report.retrieval_context()[0], "Cheap");
        assert!(!report.is_aborted());
    }

    #[test]
    fn test_aborted_report() {
        let err = SymposiumError::Llm {
            status: 401,
            message: "invalid api key".to_string(),
        };
        let report = ResearchReport::aborted("q", &err);

        assert_eq!(report.subtopics, vec!["Error occurred"]);
        assert_eq!(report.total_agents_used, 0);
        assert_eq!(
            report.final_synthesis,
            "Research failed due to error: LLM API error (401): invalid api key"
        );
        assert!(report.is_aborted());
    }
}
