//! HTTP client for the Judgment tracing and evaluation API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::example::Example;
use super::result::ScoringResult;
use super::scorer::ScorerConfig;
use crate::config::{ApiKey, Credentials, JudgmentSettings};
use crate::error::{Result, SymposiumError};
use crate::llm::retry::{with_retry, RetryConfig};
use crate::trace::{Span, TraceReport, TraceSink};

pub const DEFAULT_BASE_URL: &str = "https://api.judgmentlabs.ai";

const ORGANIZATION_HEADER: &str = "X-Organization-Id";

/// A batch of examples to score
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRequest {
    pub examples: Vec<Example>,
    pub scorers: Vec<ScorerConfig>,
    pub model: String,
    pub project_name: String,
    pub eval_name: String,
}

impl EvaluationRequest {
    pub fn new(
        examples: Vec<Example>,
        scorers: Vec<ScorerConfig>,
        model: impl Into<String>,
        project_name: impl Into<String>,
    ) -> Self {
        Self {
            examples,
            scorers,
            model: model.into(),
            project_name: project_name.into(),
            eval_name: format!("eval-{}", chrono::Utc::now().format("%Y%m%d-%H%M%S")),
        }
    }

    pub fn with_eval_name(mut self, eval_name: impl Into<String>) -> Self {
        self.eval_name = eval_name.into();
        self
    }
}

/// Scores examples remotely
#[async_trait]
pub trait EvaluationService: Send + Sync {
    /// Run the scorers over every example; one result per example.
    async fn run_evaluation(&self, request: &EvaluationRequest) -> Result<Vec<ScoringResult>>;
}

#[derive(Serialize)]
struct SaveTracePayload<'a> {
    project_name: &'a str,
    trace_id: &'a str,
    name: &'a str,
    created_at: String,
    duration: f64,
    trace_spans: &'a [Span],
    token_counts: TokenCounts,
    success: bool,
    overwrite: bool,
}

#[derive(Serialize)]
struct TokenCounts {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
    total_cost_usd: f64,
}

impl<'a> SaveTracePayload<'a> {
    fn from_report(report: &'a TraceReport) -> Self {
        Self {
            project_name: &report.project_name,
            trace_id: &report.trace_id,
            name: &report.name,
            created_at: report.started_at.to_rfc3339(),
            duration: report.duration_ms as f64 / 1000.0,
            trace_spans: &report.spans,
            token_counts: TokenCounts {
                prompt_tokens: report.summary.prompt_tokens,
                completion_tokens: report.summary.completion_tokens,
                total_tokens: report.summary.total_tokens,
                total_cost_usd: report.summary.estimated_cost_usd,
            },
            success: report.success,
            overwrite: false,
        }
    }
}

/// The evaluate endpoint answers with a bare list or a wrapped one
#[derive(Deserialize)]
#[serde(untagged)]
enum EvaluationResponse {
    Bare(Vec<ScoringResult>),
    Wrapped { results: Vec<ScoringResult> },
}

impl EvaluationResponse {
    fn into_results(self) -> Vec<ScoringResult> {
        match self {
            EvaluationResponse::Bare(results) | EvaluationResponse::Wrapped { results } => results,
        }
    }
}

/// Judgment API client
pub struct JudgmentClient {
    client: reqwest::Client,
    api_key: ApiKey,
    organization_id: String,
    base_url: String,
    retry: RetryConfig,
}

impl JudgmentClient {
    pub fn new(api_key: ApiKey, organization_id: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            organization_id: organization_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryConfig::default(),
        }
    }

    /// Build from loaded settings and credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_settings(
        settings: &JudgmentSettings,
        credentials: &Credentials,
        retry: RetryConfig,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                SymposiumError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key: credentials.judgment_api_key.clone(),
            organization_id: credentials.judgment_org_id.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn post_once<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(self.api_key.expose())
            .header(ORGANIZATION_HEADER, &self.organization_id)
            .json(body)
            .send()
            .await
            .map_err(|e| SymposiumError::Http(format!("Failed to reach Judgment API: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SymposiumError::Http(format!("Failed to read Judgment response: {}", e)))?;

        if !status.is_success() {
            let message = if text.trim().is_empty() {
                status.to_string()
            } else {
                text
            };
            return Err(SymposiumError::from_status("judgment", status.as_u16(), message));
        }

        Ok(text)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        with_retry(&self.retry, path, || self.post_once(path, body)).await
    }

    /// Save one finished trace under its project.
    pub async fn save_trace(&self, report: &TraceReport) -> Result<()> {
        let payload = SaveTracePayload::from_report(report);
        self.post("traces/save/", &payload).await?;

        tracing::debug!(
            trace_id = %report.trace_id,
            project = %report.project_name,
            "Trace saved to Judgment"
        );
        Ok(())
    }
}

#[async_trait]
impl EvaluationService for JudgmentClient {
    async fn run_evaluation(&self, request: &EvaluationRequest) -> Result<Vec<ScoringResult>> {
        tracing::info!(
            project = %request.project_name,
            eval_name = %request.eval_name,
            examples = request.examples.len(),
            scorers = request.scorers.len(),
            "Running Judgment evaluation"
        );

        let body = self.post("evaluate/", request).await?;
        let results = serde_json::from_str::<EvaluationResponse>(&body)
            .map_err(|e| SymposiumError::Judgment {
                status: 200,
                message: format!("Failed to parse evaluation response: {}", e),
            })?
            .into_results();

        if results.len() != request.examples.len() {
            return Err(SymposiumError::Judgment {
                status: 200,
                message: format!(
                    "Expected {} evaluation results, got {}",
                    request.examples.len(),
                    results.len()
                ),
            });
        }

        Ok(results)
    }
}

#[async_trait]
impl TraceSink for JudgmentClient {
    async fn submit(&self, report: &TraceReport) -> Result<()> {
        self.save_trace(report).await
    }

    fn name(&self) -> &str {
        "judgment"
    }
}
