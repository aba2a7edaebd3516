//! Research agent: search, analyze, store

use std::sync::Arc;

use super::report::Finding;
use super::role::{researcher_request, AgentRole};
use super::search::SearchTool;
use super::store::ResearchStore;
use crate::error::{Result, SymposiumError};
use crate::llm::LLMProvider;
use crate::trace::{SpanType, Tracer};

/// Investigates one subtopic per invocation
pub struct ResearchAgent {
    provider: Arc<dyn LLMProvider>,
    search: Arc<dyn SearchTool>,
    store: Arc<ResearchStore>,
    tracer: Arc<Tracer>,
    max_tokens: usize,
    temperature: Option<f32>,
}

impl ResearchAgent {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        search: Arc<dyn SearchTool>,
        store: Arc<ResearchStore>,
        tracer: Arc<Tracer>,
        max_tokens: usize,
    ) -> Self {
        Self {
            provider,
            search,
            store,
            tracer,
            max_tokens,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Research `topic` as agent `agent_id`.
    ///
    /// Never fails: an error becomes a `"Research failed: ..."` finding.
    pub async fn research(&self, topic: &str, agent_id: usize) -> Finding {
        tracing::info!(agent_id, topic, "Research agent starting");

        let result = self
            .tracer
            .observe(
                AgentRole::Researcher.span_name(),
                SpanType::Function,
                serde_json::json!({ "topic": topic, "agent_id": agent_id }),
                self.investigate(topic, agent_id),
            )
            .await;

        match result {
            Ok(finding) => finding,
            Err(e) => {
                tracing::warn!(agent_id, topic, error = %e, "Research agent failed");
                Finding::failed(agent_id, topic, &e)
            }
        }
    }

    async fn investigate(&self, topic: &str, agent_id: usize) -> Result<Finding> {
        let query = format!("{} research analysis", topic);
        let search_results = self
            .tracer
            .observe(
                self.search.name(),
                SpanType::Tool,
                serde_json::json!({ "query": query }),
                self.search.search(&query),
            )
            .await?;

        let request = researcher_request(topic, &search_results.results, self.max_tokens)
            .temperature(self.temperature);
        let response = self.provider.generate_request(&request).await?;

        let findings = match response.text() {
            Some(text) => text.to_string(),
            None => {
                tracing::warn!(agent_id, topic, "Empty research reply, using placeholder analysis");
                format!("Analysis of {} based on available research data.", topic)
            }
        };

        let finding = Finding {
            agent_id,
            topic: topic.to_string(),
            findings,
            sources: search_results.sources,
            search_query: search_results.query,
        };

        let store = self.store.clone();
        let stored = finding.clone();
        self.tracer
            .observe(
                "store_research",
                SpanType::Tool,
                serde_json::to_value(&finding)?,
                async move { Ok::<_, SymposiumError>(store.store(stored)) },
            )
            .await?;

        Ok(finding)
    }
}
