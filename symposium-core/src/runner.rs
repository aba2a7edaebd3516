//! End-to-end research run
//!
//! The runner wires the LLM provider, tracer, agents and evaluator together
//! and executes one pass: plan, research each subtopic, synthesize, evaluate.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Credentials, SymposiumConfig};
use crate::error::Result;
use crate::judgment::{EvaluationService, JudgmentClient};
use crate::llm::{LLMProvider, OpenAIProvider};
use crate::research::{
    evaluate_research_quality, EvaluationSummary, LeadAgent, MockSearch, ResearchAgent,
    ResearchReport, ResearchStore, SearchTool,
};
use crate::trace::{
    merge_summaries, FanoutSink, JsonFileSink, NullSink, TraceReport, TraceSink, TraceSummary,
    TracedProvider, Tracer,
};

/// Per-invocation switches that are not part of the configuration files
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Also append every trace to this JSON lines file
    pub trace_out: Option<PathBuf>,
    /// Skip evaluation even if enabled in configuration
    pub skip_evaluation: bool,
}

/// Everything one run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub report: ResearchReport,
    /// `None` when evaluation was disabled
    pub evaluation: Option<EvaluationSummary>,
    pub traces: Vec<TraceReport>,
    /// Spans, tokens and cost across all traces
    pub usage: TraceSummary,
}

/// Executes research runs
pub struct Runner {
    config: SymposiumConfig,
    tracer: Arc<Tracer>,
    lead: LeadAgent,
    researcher: ResearchAgent,
    store: Arc<ResearchStore>,
    evaluator: Option<Arc<dyn EvaluationService>>,
}

impl Runner {
    /// Assemble a runner from explicit parts.
    ///
    /// `provider` is wrapped so each call is traced; `sink` receives one
    /// trace per agent invocation.
    pub fn new(
        config: SymposiumConfig,
        provider: Arc<dyn LLMProvider>,
        sink: Arc<dyn TraceSink>,
        search: Arc<dyn SearchTool>,
        evaluator: Option<Arc<dyn EvaluationService>>,
    ) -> Self {
        let tracer = Arc::new(
            Tracer::new(config.judgment.project_name.clone(), sink)
                .with_model(provider.model_info()),
        );
        let traced: Arc<dyn LLMProvider> = Arc::new(TracedProvider::new(provider, tracer.clone()));
        let store = Arc::new(ResearchStore::new());

        let lead = LeadAgent::new(traced.clone(), tracer.clone(), config.research.clone())
            .with_temperature(config.llm.temperature);
        let researcher = ResearchAgent::new(
            traced,
            search,
            store.clone(),
            tracer.clone(),
            config.research.researcher_max_tokens,
        )
        .with_temperature(config.llm.temperature);

        Self {
            config,
            tracer,
            lead,
            researcher,
            store,
            evaluator,
        }
    }

    /// Build the production runner: OpenAI provider, Judgment sink and evaluator.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn from_config(
        config: SymposiumConfig,
        credentials: Credentials,
        options: RunOptions,
    ) -> Result<Self> {
        let provider =
            OpenAIProvider::from_settings(&config.llm, credentials.openai_api_key.clone())?
                .with_retry(config.retry.clone());
        let judgment = Arc::new(JudgmentClient::from_settings(
            &config.judgment,
            &credentials,
            config.retry.clone(),
        )?);

        let mut sinks: Vec<Arc<dyn TraceSink>> = Vec::new();
        if config.judgment.tracing_enabled {
            sinks.push(judgment.clone());
        }
        if let Some(path) = options.trace_out {
            sinks.push(Arc::new(JsonFileSink::new(path)));
        }
        let sink: Arc<dyn TraceSink> = match sinks.len() {
            0 => Arc::new(NullSink),
            1 => sinks.remove(0),
            _ => Arc::new(
                sinks
                    .into_iter()
                    .fold(FanoutSink::new(), |fanout, sink| fanout.with_sink(sink)),
            ),
        };

        let evaluator = if config.evaluation.enabled && !options.skip_evaluation {
            Some(judgment as Arc<dyn EvaluationService>)
        } else {
            None
        };

        tracing::debug!(
            model = %config.llm.model,
            sink = sink.name(),
            evaluation = evaluator.is_some(),
            "Runner assembled"
        );

        Ok(Self::new(
            config,
            Arc::new(provider),
            sink,
            Arc::new(MockSearch),
            evaluator,
        ))
    }

    /// Check credentials, then build the production runner.
    ///
    /// # Errors
    ///
    /// [`crate::SymposiumError::MissingCredentials`] naming every absent key.
    pub fn from_env(config: SymposiumConfig, options: RunOptions) -> Result<Self> {
        let credentials = Credentials::from_env()?;
        Self::from_config(config, credentials, options)
    }

    pub fn config(&self) -> &SymposiumConfig {
        &self.config
    }

    pub fn tracer(&self) -> &Arc<Tracer> {
        &self.tracer
    }

    /// Plan, research every subtopic in order, and synthesize.
    ///
    /// When planning fails nothing is researched and the report records the
    /// error.
    pub async fn research(&self, question: &str) -> ResearchReport {
        tracing::info!(question, "Starting research");

        let subtopics = match self.lead.plan(question).await {
            Ok(subtopics) => subtopics,
            Err(e) => {
                tracing::error!(error = %e, "Lead agent failed, aborting research");
                return ResearchReport::aborted(question, &e);
            }
        };

        let mut findings = Vec::with_capacity(subtopics.len());
        for (index, subtopic) in subtopics.iter().enumerate() {
            findings.push(self.researcher.research(subtopic, index + 1).await);
        }

        let synthesis = self.lead.synthesize(question, &findings).await;
        let report = ResearchReport::new(question, subtopics, findings, synthesis);

        tracing::info!(
            agents = report.total_agents_used,
            failed = report.failed_agents(),
            stored = self.store.len(),
            "Research complete"
        );
        report
    }

    /// Research `question`, then evaluate the report if an evaluator is set.
    pub async fn run(&self, question: &str) -> RunOutcome {
        let traces_before = self.tracer.completed_traces().len();

        let report = self.research(question).await;

        let evaluation = match &self.evaluator {
            Some(evaluator) => Some(
                evaluate_research_quality(evaluator.as_ref(), &report, &self.config.evaluation)
                    .await,
            ),
            None => None,
        };

        let traces: Vec<TraceReport> = self
            .tracer
            .completed_traces()
            .into_iter()
            .skip(traces_before)
            .collect();
        let usage = merge_summaries(&traces);

        RunOutcome {
            report,
            evaluation,
            traces,
            usage,
        }
    }

    /// Run the configured question
    pub async fn run_default(&self) -> RunOutcome {
        let question = self.config.research.question.clone();
        self.run(&question).await
    }
}
