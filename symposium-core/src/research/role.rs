//! Agent roles and their prompts

use serde::{Deserialize, Serialize};

use crate::config::ResearchSettings;
use crate::llm::LLMRequest;

/// The three kinds of agent in a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRole {
    /// Breaks the question into subtopics
    Planner,
    /// Investigates one subtopic
    Researcher,
    /// Merges findings into the final report
    Synthesizer,
}

impl AgentRole {
    pub fn label(&self) -> &'static str {
        match self {
            AgentRole::Planner => "Lead Agent (planner)",
            AgentRole::Researcher => "Research Agent",
            AgentRole::Synthesizer => "Lead Agent (synthesizer)",
        }
    }

    /// Name of the root span recorded for one invocation
    pub fn span_name(&self) -> &'static str {
        match self {
            AgentRole::Planner => "lead_agent_plan",
            AgentRole::Researcher => "research_agent",
            AgentRole::Synthesizer => "lead_agent_synthesize",
        }
    }

    pub fn max_tokens(&self, settings: &ResearchSettings) -> usize {
        match self {
            AgentRole::Planner => settings.planner_max_tokens,
            AgentRole::Researcher => settings.researcher_max_tokens,
            AgentRole::Synthesizer => settings.synthesizer_max_tokens,
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn planner_request(question: &str, subtopic_count: usize, max_tokens: usize) -> LLMRequest {
    LLMRequest::with_system_prompt(
        format!(
            "You are a research coordinator. Break down complex research questions into {} specific subtopics for specialized agents.",
            subtopic_count
        ),
        format!(
            "Break down this research question into {} subtopics: {}",
            subtopic_count, question
        ),
    )
    .max_tokens(max_tokens)
}

pub fn researcher_request(topic: &str, results: &[String], max_tokens: usize) -> LLMRequest {
    LLMRequest::with_system_prompt(
        format!(
            "You are a research agent specializing in {}. Provide detailed analysis based on the search results.",
            topic
        ),
        format!("Analyze this research data: {}", quoted_list(results)),
    )
    .max_tokens(max_tokens)
}

/// Render items as `['a', 'b']`, verbatim between the quotes
fn quoted_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| format!("'{}'", item)).collect();
    format!("[{}]", quoted.join(", "))
}

pub fn synthesizer_request(question: &str, findings: &[&str], max_tokens: usize) -> LLMRequest {
    LLMRequest::with_system_prompt(
        "You are a senior researcher. Synthesize multiple research findings into a comprehensive report.",
        format!(
            "Original question: {}\n\nResearch findings:\n{}\n\nCreate a comprehensive synthesis.",
            question,
            findings.join("\n")
        ),
    )
    .max_tokens(max_tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_prompt() {
        let request = planner_request("Why?", 3, 200);
        assert_eq!(
            request.messages[0].content,
            "You are a research coordinator. Break down complex research questions into 3 specific subtopics for specialized agents."
        );
        assert_eq!(
            request.messages[1].content,
            "Break down this research question into 3 subtopics: Why?"
        );
        assert_eq!(request.max_tokens, Some(200));
    }

    #[test]
    fn test_researcher_prompt_lists_results() {
        let results = vec!["a".to_string(), "b".to_string()];
        let request = researcher_request("Solar", &results, 300);
        assert!(request.messages[0].content.contains("specializing in Solar"));
        assert_eq!(request.messages[1].content, "Analyze this research data: ['a', 'b']");
    }

    #[test]
    fn test_researcher_prompt_keeps_quotes_unescaped() {
        let results = vec![r#"Findings on "grid" \ storage"#.to_string()];
        let request = researcher_request("Grid", &results, 300);
        assert_eq!(
            request.messages[1].content,
            r#"Analyze this research data: ['Findings on "grid" \ storage']"#
        );
    }

    #[test]
    fn test_synthesizer_prompt_joins_findings() {
        let request = synthesizer_request("Q", &["one", "two"], 500);
        assert_eq!(
            request.messages[1].content,
            "Original question: Q\n\nResearch findings:\none\ntwo\n\nCreate a comprehensive synthesis."
        );
    }

    #[test]
    fn test_role_token_limits() {
        let settings = ResearchSettings::default();
        assert_eq!(AgentRole::Planner.max_tokens(&settings), 200);
        assert_eq!(AgentRole::Researcher.max_tokens(&settings), 300);
        assert_eq!(AgentRole::Synthesizer.max_tokens(&settings), 500);
    }
}
