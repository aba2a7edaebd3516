//! Error types for Symposium operations

/// Result type for Symposium operations
pub type Result<T> = std::result::Result<T, SymposiumError>;

/// Error types for the research pipeline
#[derive(Debug, thiserror::Error)]
pub enum SymposiumError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Required credentials are absent from the environment
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The LLM API answered with an error
    #[error("LLM API error ({status}): {message}")]
    Llm { status: u16, message: String },

    /// The LLM API rejected the request because of rate limiting
    #[error("Rate limited by {service}: {message}")]
    RateLimited { service: String, message: String },

    /// The Judgment API answered with an error
    #[error("Judgment API error ({status}): {message}")]
    Judgment { status: u16, message: String },

    /// Agent-level failure
    #[error("Agent error: {0}")]
    Agent(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl SymposiumError {
    /// Whether retrying the same request may succeed.
    ///
    /// Transport failures, rate limits and 5xx replies are transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            SymposiumError::Http(_) | SymposiumError::RateLimited { .. } => true,
            SymposiumError::Llm { status, .. } | SymposiumError::Judgment { status, .. } => {
                *status >= 500
            }
            _ => false,
        }
    }

    /// Build the error for a non-success HTTP reply from `service`
    pub fn from_status(service: &str, status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match (service, status) {
            (_, 429) => SymposiumError::RateLimited {
                service: service.to_string(),
                message,
            },
            ("judgment", _) => SymposiumError::Judgment { status, message },
            _ => SymposiumError::Llm { status, message },
        }
    }

    /// Whether this error is fatal at startup
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SymposiumError::Configuration(_) | SymposiumError::MissingCredentials(_)
        )
    }
}

impl From<reqwest::Error> for SymposiumError {
    fn from(err: reqwest::Error) -> Self {
        SymposiumError::Http(err.to_string())
    }
}

impl From<figment::Error> for SymposiumError {
    fn from(err: figment::Error) -> Self {
        SymposiumError::Configuration(err.to_string())
    }
}

impl From<String> for SymposiumError {
    fn from(s: String) -> Self {
        SymposiumError::Other(s)
    }
}

impl From<&str> for SymposiumError {
    fn from(s: &str) -> Self {
        SymposiumError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for SymposiumError {
    fn from(err: anyhow::Error) -> Self {
        SymposiumError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_lists_all_keys() {
        let err = SymposiumError::MissingCredentials(vec![
            "OPENAI_API_KEY".to_string(),
            "JUDGMENT_ORG_ID".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: OPENAI_API_KEY, JUDGMENT_ORG_ID"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(SymposiumError::Http("connection reset".into()).is_retryable());
        assert!(
            SymposiumError::RateLimited {
                service: "openai".into(),
                message: "slow down".into()
            }
            .is_retryable()
        );
        assert!(
            SymposiumError::Llm {
                status: 503,
                message: "overloaded".into()
            }
            .is_retryable()
        );
        assert!(
            !SymposiumError::Llm {
                status: 401,
                message: "bad key".into()
            }
            .is_retryable()
        );
        assert!(!SymposiumError::Configuration("x".into()).is_retryable());
        assert!(!SymposiumError::Agent("x".into()).is_retryable());
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            SymposiumError::from_status("openai", 429, "slow down"),
            SymposiumError::RateLimited { .. }
        ));
        assert!(matches!(
            SymposiumError::from_status("judgment", 500, "boom"),
            SymposiumError::Judgment { status: 500, .. }
        ));
        assert!(matches!(
            SymposiumError::from_status("openai", 400, "bad"),
            SymposiumError::Llm { status: 400, .. }
        ));
    }
}
