//! LLM client abstractions
//!
//! Agents talk to the model only through [`LLMProvider`], so the HTTP
//! provider, the tracing wrapper and test doubles are interchangeable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod providers;
pub mod retry;

pub use providers::OpenAIProvider;
pub use retry::{with_retry, RetryConfig, RetryState};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request to an LLM provider
#[derive(Debug, Clone, Serialize)]
pub struct LLMRequest {
    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Temperature for generation (0.0-2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Stop sequences
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

impl LLMRequest {
    /// Create a simple request from a single prompt
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::user(prompt)],
            temperature: None,
            max_tokens: None,
            stop_sequences: Vec::new(),
        }
    }

    /// Create a request with system prompt
    pub fn with_system_prompt(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            temperature: None,
            max_tokens: None,
            stop_sequences: Vec::new(),
        }
    }

    pub fn max_tokens(mut self, tokens: usize) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature.map(|t| t.clamp(0.0, 2.0));
        self
    }
}

/// Response from an LLM provider
#[derive(Debug, Clone, Serialize)]
pub struct LLMResponse {
    /// Generated content
    pub content: String,

    /// Token usage information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl LLMResponse {
    /// Content with surrounding whitespace removed, `None` when blank
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.content.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

/// Model information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub provider: String,
    pub model_name: String,
}

/// Trait for chat-completion backends.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Send one request and return the first completion.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success statuses and malformed replies.
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse>;

    /// Get model information
    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            provider: "unknown".to_string(),
            model_name: "unknown".to_string(),
        }
    }
}

#[async_trait]
impl<P: LLMProvider + ?Sized> LLMProvider for std::sync::Arc<P> {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        (**self).generate_request(request).await
    }

    fn model_info(&self) -> ModelInfo {
        (**self).model_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_with_system_prompt() {
        let request = LLMRequest::with_system_prompt("You are helpful", "Hello").max_tokens(200);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].content, "Hello");
        assert_eq!(request.max_tokens, Some(200));
    }

    #[test]
    fn test_temperature_clamping() {
        let request = LLMRequest::from_prompt("x").temperature(Some(5.0));
        assert_eq!(request.temperature, Some(2.0));

        let request = LLMRequest::from_prompt("x").temperature(Some(-1.0));
        assert_eq!(request.temperature, Some(0.0));
    }

    #[test]
    fn test_response_text_blank() {
        let response = LLMResponse {
            content: "  \n".to_string(),
            usage: None,
        };
        assert_eq!(response.text(), None);

        let response = LLMResponse {
            content: " answer ".to_string(),
            usage: None,
        };
        assert_eq!(response.text(), Some("answer"));
    }
}
