//! OpenAI-compatible chat completion provider

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{ApiKey, LlmSettings};
use crate::error::{Result, SymposiumError};
use crate::llm::retry::{with_retry, RetryConfig};
use crate::llm::{
    LLMProvider, LLMRequest, LLMResponse, Message, MessageRole, ModelInfo, TokenUsage,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat completions provider (also works with compatible gateways).
pub struct OpenAIProvider {
    client: reqwest::Client,
    api_key: ApiKey,
    model: String,
    base_url: String,
    retry: RetryConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Model name (e.g., "gpt-3.5-turbo", "gpt-4o")
    pub fn new(api_key: ApiKey, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Create with a custom base URL (for Azure OpenAI or compatible APIs).
    pub fn with_base_url(
        api_key: ApiKey,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        }
    }

    /// Builder: set the retry policy for transient failures
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Create from loaded settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_settings(settings: &LlmSettings, api_key: ApiKey) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                SymposiumError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_key,
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_once(&self, openai_request: &OpenAIRequest) -> Result<LLMResponse> {
        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose())
            .json(openai_request)
            .send()
            .await
            .map_err(|e| SymposiumError::Http(format!("Failed to send request to OpenAI: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SymposiumError::Http(format!("Failed to read OpenAI response: {}", e)))?;

        if !status.is_success() {
            return Err(SymposiumError::from_status(
                "openai",
                status.as_u16(),
                error_message(status, &body),
            ));
        }

        parse_response(&body)
    }
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
}

#[derive(Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: Option<OpenAIMessageResponse>,
}

#[derive(Deserialize)]
struct OpenAIMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[derive(Deserialize)]
struct OpenAIError {
    error: OpenAIErrorDetail,
}

#[derive(Deserialize)]
struct OpenAIErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

fn convert_messages(messages: &[Message]) -> Vec<OpenAIMessage> {
    messages
        .iter()
        .map(|m| OpenAIMessage {
            role: match m.role {
                MessageRole::System => "system".to_string(),
                MessageRole::User => "user".to_string(),
                MessageRole::Assistant => "assistant".to_string(),
            },
            content: m.content.clone(),
        })
        .collect()
}

fn build_request(model: &str, request: &LLMRequest) -> OpenAIRequest {
    OpenAIRequest {
        model: model.to_string(),
        messages: convert_messages(&request.messages),
        temperature: request.temperature,
        max_tokens: request.max_tokens,
        stop: if request.stop_sequences.is_empty() {
            None
        } else {
            Some(request.stop_sequences.clone())
        },
    }
}

/// Turn an error body into a readable message, preferring the OpenAI error envelope
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<OpenAIError>(body) {
        Ok(error) => format!(
            "{}: {}",
            error.error.error_type.unwrap_or_else(|| status.to_string()),
            error.error.message
        ),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => body.to_string(),
    }
}

fn parse_response(body: &str) -> Result<LLMResponse> {
    let openai_response: OpenAIResponse = serde_json::from_str(body).map_err(|e| {
        SymposiumError::Llm {
            status: 200,
            message: format!("Failed to parse OpenAI response: {}", e),
        }
    })?;

    // No choices is an empty reply, not an error; callers substitute placeholder text.
    let content = match openai_response.choices.into_iter().next() {
        Some(first) => first.message.and_then(|m| m.content).unwrap_or_default(),
        None => {
            tracing::warn!("OpenAI API returned no choices");
            String::new()
        }
    };

    let usage = openai_response.usage.map(|u| TokenUsage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    Ok(LLMResponse { content, usage })
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let openai_request = build_request(&self.model, request);
        with_retry(&self.retry, "openai.chat_completions", || {
            self.send_once(&openai_request)
        })
        .await
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "openai".to_string(),
            model_name: self.model.clone(),
        }
    }
}
