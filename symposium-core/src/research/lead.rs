//! Lead agent: plans the research and synthesizes the findings

use std::sync::Arc;

use super::plan::subtopics_or_fallback;
use super::report::Finding;
use super::role::{planner_request, synthesizer_request, AgentRole};
use crate::config::ResearchSettings;
use crate::error::Result;
use crate::llm::LLMProvider;
use crate::trace::{SpanType, Tracer};

pub const NO_FINDINGS_SYNTHESIS: &str = "Research could not be completed due to technical issues.";

/// Coordinates a run from question to synthesis
pub struct LeadAgent {
    provider: Arc<dyn LLMProvider>,
    tracer: Arc<Tracer>,
    settings: ResearchSettings,
    temperature: Option<f32>,
}

impl LeadAgent {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        tracer: Arc<Tracer>,
        settings: ResearchSettings,
    ) -> Self {
        Self {
            provider,
            tracer,
            settings,
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn settings(&self) -> &ResearchSettings {
        &self.settings
    }

    /// Break the question into subtopics.
    ///
    /// An empty or unusable planner reply yields the fallback subtopics.
    ///
    /// # Errors
    ///
    /// Returns the LLM error when the planner call itself fails; the run
    /// cannot proceed without a plan.
    pub async fn plan(&self, question: &str) -> Result<Vec<String>> {
        tracing::info!(question, "Lead agent planning research");

        let subtopics = self
            .tracer
            .observe(
                AgentRole::Planner.span_name(),
                SpanType::Function,
                serde_json::json!({ "research_question": question }),
                self.request_plan(question),
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Planner failed"))?;

        tracing::info!(?subtopics, "Research plan ready");
        Ok(subtopics)
    }

    async fn request_plan(&self, question: &str) -> Result<Vec<String>> {
        let request = planner_request(
            question,
            self.settings.max_subtopics,
            AgentRole::Planner.max_tokens(&self.settings),
        )
        .temperature(self.temperature);

        let response = self.provider.generate_request(&request).await?;
        Ok(subtopics_or_fallback(
            response.text(),
            self.settings.max_subtopics,
            &self.settings.fallback_subtopics,
        ))
    }

    /// Merge the findings into the final report text.
    ///
    /// With no findings the synthesizer is not called.
    pub async fn synthesize(&self, question: &str, findings: &[Finding]) -> String {
        if findings.is_empty() {
            tracing::warn!("No findings to synthesize");
            return NO_FINDINGS_SYNTHESIS.to_string();
        }

        tracing::info!(findings = findings.len(), "Lead agent synthesizing findings");

        let result = self
            .tracer
            .observe(
                AgentRole::Synthesizer.span_name(),
                SpanType::Function,
                serde_json::json!({
                    "research_question": question,
                    "findings": findings.len(),
                }),
                self.request_synthesis(question, findings),
            )
            .await;

        match result {
            Ok(synthesis) => synthesis,
            Err(e) => {
                tracing::error!(error = %e, "Synthesis failed");
                format!("Research failed due to error: {}", e)
            }
        }
    }

    async fn request_synthesis(&self, question: &str, findings: &[Finding]) -> Result<String> {
        let texts: Vec<&str> = findings.iter().map(|f| f.findings.as_str()).collect();
        let request = synthesizer_request(
            question,
            &texts,
            AgentRole::Synthesizer.max_tokens(&self.settings),
        )
        .temperature(self.temperature);

        let response = self.provider.generate_request(&request).await?;
        Ok(match response.text() {
            Some(text) => text.to_string(),
            None => format!(
                "Synthesis of research on: {}\n\nBased on findings from {} research agents.",
                question,
                findings.len()
            ),
        })
    }
}
