//! LLM provider wrapper that records every call as an `llm` span

use async_trait::async_trait;
use std::sync::Arc;

use super::span::{SpanOutcome, SpanType};
use super::tracer::Tracer;
use crate::error::Result;
use crate::llm::{LLMProvider, LLMRequest, LLMResponse, ModelInfo};

/// Wraps a provider so each request/response pair lands in the current trace
pub struct TracedProvider<P> {
    inner: P,
    tracer: Arc<Tracer>,
}

impl<P: LLMProvider> TracedProvider<P> {
    pub fn new(inner: P, tracer: Arc<Tracer>) -> Self {
        Self { inner, tracer }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn tracer(&self) -> &Arc<Tracer> {
        &self.tracer
    }
}

#[async_trait]
impl<P: LLMProvider> LLMProvider for TracedProvider<P> {
    async fn generate_request(&self, request: &LLMRequest) -> Result<LLMResponse> {
        let model_info = self.inner.model_info();
        let span_name = format!("{}.chat", model_info.provider);

        let handle = self.tracer.start_span(
            span_name,
            SpanType::Llm,
            serde_json::json!({
                "model": model_info.model_name,
                "messages": request.messages,
                "max_tokens": request.max_tokens,
                "temperature": request.temperature,
            }),
        );

        let result = self.inner.generate_request(request).await;

        let outcome = match &result {
            Ok(response) => SpanOutcome::ok(serde_json::json!({ "content": response.content }))
                .with_usage(response.usage),
            Err(e) => {
                tracing::warn!(model = %model_info.model_name, error = %e, "LLM call failed");
                SpanOutcome::failed(e.to_string())
            }
        };
        self.tracer.close_span(handle, outcome).await;

        result
    }

    fn model_info(&self) -> ModelInfo {
        self.inner.model_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymposiumError;
    use crate::llm::TokenUsage;
    use crate::trace::sink::MemorySink;

    struct Canned(Option<&'static str>);

    #[async_trait]
    impl LLMProvider for Canned {
        async fn generate_request(&self, _request: &LLMRequest) -> Result<LLMResponse> {
            match self.0 {
                Some(content) => Ok(LLMResponse {
                    content: content.to_string(),
                    usage: Some(TokenUsage {
                        prompt_tokens: 7,
                        completion_tokens: 3,
                        total_tokens: 10,
                    }),
                }),
                None => Err(SymposiumError::Llm {
                    status: 401,
                    message: "bad key".to_string(),
                }),
            }
        }

        fn model_info(&self) -> ModelInfo {
            ModelInfo {
                provider: "openai".to_string(),
                model_name: "gpt-3.5-turbo".to_string(),
            }
        }
    }

    #[tokio::test]
    async fn test_records_llm_span_with_usage() {
        let sink = Arc::new(MemorySink::new());
        let tracer = Arc::new(Tracer::new("proj", sink.clone()));
        let provider = TracedProvider::new(Canned(Some("hello")), tracer.clone());

        tracer
            .observe("agent", SpanType::Function, serde_json::Value::Null, async {
                provider
                    .generate_request(&LLMRequest::with_system_prompt("sys", "usr"))
                    .await
                    .map(|r| r.content)
            })
            .await
            .unwrap();

        let reports = sink.reports();
        let report = &reports[0];
        let llm: Vec<_> = report.spans_of(SpanType::Llm).collect();
        assert_eq!(llm.len(), 1);
        assert_eq!(llm[0].name, "openai.chat");
        assert_eq!(llm[0].inputs["model"], "gpt-3.5-turbo");
        assert_eq!(llm[0].inputs["messages"][1]["content"], "usr");
        assert_eq!(llm[0].output.as_ref().unwrap()["content"], "hello");
        assert_eq!(report.summary.total_tokens, 10);
    }

    #[tokio::test]
    async fn test_records_llm_failure() {
        let sink = Arc::new(MemorySink::new());
        let tracer = Arc::new(Tracer::new("proj", sink.clone()));
        let provider = TracedProvider::new(Canned(None), tracer);

        let result = provider
            .generate_request(&LLMRequest::from_prompt("x"))
            .await;
        assert!(result.is_err());

        let reports = sink.reports();
        let report = &reports[0];
        assert!(!report.success);
        assert!(report.spans[0].error.as_deref().unwrap().contains("bad key"));
    }
}
