//! Configuration types for the research pipeline
//!
//! Settings come from, in increasing priority:
//! 1. Built-in defaults
//! 2. `symposium.toml` in the working directory
//! 3. The file named by `SYMPOSIUM_CONFIG_PATH`
//! 4. An explicit path (the CLI `--config` flag)
//! 5. Conventional provider variables (`OPENAI_MODEL`, `OPENAI_BASE_URL`, `JUDGMENT_API_URL`)
//! 6. `SYMPOSIUM_*` variables, `__` separating sections (`SYMPOSIUM_RESEARCH__MAX_SUBTOPICS=2`)
//!
//! Secrets never pass through figment; see [`Credentials`].

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
    value::{Uncased, UncasedStr},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SymposiumError};
use crate::llm::RetryConfig;

/// Question researched when none is supplied
pub const DEFAULT_QUESTION: &str = "What are the main challenges and opportunities for renewable energy adoption in developing countries?";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SymposiumConfig {
    /// LLM endpoint configuration
    pub llm: LlmSettings,

    /// Judgment tracing/evaluation service configuration
    pub judgment: JudgmentSettings,

    /// Research pipeline configuration
    pub research: ResearchSettings,

    /// Report evaluation configuration
    pub evaluation: EvaluationSettings,

    /// Retry policy for external calls
    pub retry: RetryConfig,
}

/// LLM endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model used by every agent role
    pub model: String,

    /// OpenAI-compatible base URL
    pub base_url: String,

    /// Sampling temperature; the provider default is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Judgment service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgmentSettings {
    /// Submit traces to Judgment
    pub tracing_enabled: bool,

    /// API base URL
    pub base_url: String,

    /// Project receiving agent traces
    pub project_name: String,

    /// Request timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for JudgmentSettings {
    fn default() -> Self {
        Self {
            tracing_enabled: true,
            base_url: "https://api.judgmentlabs.ai".to_string(),
            project_name: "multi_agent_research_v2".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Research pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    /// Question researched when the CLI does not supply one
    pub question: String,

    /// Maximum subtopics taken from the planner reply
    pub max_subtopics: usize,

    /// Subtopics used when the planner reply has nothing usable
    pub fallback_subtopics: Vec<String>,

    /// Token limit for the planner call
    pub planner_max_tokens: usize,

    /// Token limit for each research agent call
    pub researcher_max_tokens: usize,

    /// Token limit for the synthesis call
    pub synthesizer_max_tokens: usize,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION.to_string(),
            max_subtopics: 3,
            fallback_subtopics: vec![
                "Technical challenges".to_string(),
                "Economic factors".to_string(),
                "Policy considerations".to_string(),
            ],
            planner_max_tokens: 200,
            researcher_max_tokens: 300,
            synthesizer_max_tokens: 500,
        }
    }
}

/// Report evaluation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    /// Run the Judgment evaluation after the report is produced
    pub enabled: bool,

    /// Judge model used by the scorers
    pub model: String,

    /// Project receiving evaluation results
    pub project_name: String,

    /// Name of the evaluation run; a timestamped name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_name: Option<String>,

    /// Minimum faithfulness score for success
    pub faithfulness_threshold: f64,

    /// Minimum answer relevancy score for success
    pub relevancy_threshold: f64,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gpt-3.5-turbo".to_string(),
            project_name: "multi_agent_research_eval".to_string(),
            eval_name: None,
            faithfulness_threshold: 0.7,
            relevancy_threshold: 0.6,
        }
    }
}

impl SymposiumConfig {
    /// Load configuration from the default sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is invalid or a value fails validation.
    pub fn load() -> Result<Self> {
        Self::load_with(None::<&Path>)
    }

    /// Load configuration, merging an extra TOML file above the default files.
    pub fn load_with(path: Option<impl AsRef<Path>>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(SymposiumConfig::default()))
            .merge(Toml::file("symposium.toml"));

        if let Ok(path) = std::env::var("SYMPOSIUM_CONFIG_PATH") {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = path {
            let path = path.as_ref();
            if !path.exists() {
                return Err(SymposiumError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        let figment = figment
            .merge(Env::raw().filter_map(provider_env_key))
            .merge(Env::prefixed("SYMPOSIUM_").split("__"));

        let config: SymposiumConfig = figment.extract().map_err(|e| {
            SymposiumError::Configuration(format!("Failed to load configuration: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path only.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: SymposiumConfig =
            Figment::from(Serialized::defaults(SymposiumConfig::default()))
                .merge(Toml::file(path))
                .extract()
                .map_err(|e| {
                    SymposiumError::Configuration(format!(
                        "Failed to load configuration file: {}",
                        e
                    ))
                })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        if self.llm.model.trim().is_empty() {
            return Err(SymposiumError::Configuration("llm.model must not be empty".into()));
        }
        if self.llm.base_url.trim().is_empty() {
            return Err(SymposiumError::Configuration("llm.base_url must not be empty".into()));
        }
        if let Some(t) = self.llm.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(SymposiumError::Configuration(format!(
                    "llm.temperature must be within 0.0..=2.0, got {}",
                    t
                )));
            }
        }
        if self.judgment.base_url.trim().is_empty() {
            return Err(SymposiumError::Configuration(
                "judgment.base_url must not be empty".into(),
            ));
        }
        if self.research.max_subtopics == 0 {
            return Err(SymposiumError::Configuration(
                "research.max_subtopics must be at least 1".into(),
            ));
        }
        if self.research.fallback_subtopics.is_empty() {
            return Err(SymposiumError::Configuration(
                "research.fallback_subtopics must not be empty".into(),
            ));
        }
        for (name, value) in [
            ("evaluation.faithfulness_threshold", self.evaluation.faithfulness_threshold),
            ("evaluation.relevancy_threshold", self.evaluation.relevancy_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SymposiumError::Configuration(format!(
                    "{} must be within 0.0..=1.0, got {}",
                    name, value
                )));
            }
        }
        if self.retry.max_attempts == 0 {
            return Err(SymposiumError::Configuration(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Maps conventional provider variables onto config keys
fn provider_env_key(key: &UncasedStr) -> Option<Uncased<'_>> {
    match key.as_str().to_ascii_uppercase().as_str() {
        "OPENAI_MODEL" => Some("llm.model".into()),
        "OPENAI_BASE_URL" => Some("llm.base_url".into()),
        "JUDGMENT_API_URL" => Some("judgment.base_url".into()),
        _ => None,
    }
}

/// An API secret. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for request headers only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(****)")
    }
}

/// Secrets required before any external call.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub openai_api_key: ApiKey,
    pub judgment_api_key: ApiKey,
    pub judgment_org_id: String,
}

impl Credentials {
    pub const OPENAI_API_KEY: &'static str = "OPENAI_API_KEY";
    pub const JUDGMENT_API_KEY: &'static str = "JUDGMENT_API_KEY";
    pub const JUDGMENT_ORG_ID: &'static str = "JUDGMENT_ORG_ID";

    /// Every variable that must be present
    pub const REQUIRED: [&'static str; 3] = [
        Self::OPENAI_API_KEY,
        Self::JUDGMENT_API_KEY,
        Self::JUDGMENT_ORG_ID,
    ];

    /// Read credentials from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SymposiumError::MissingCredentials`] naming every absent or blank variable.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let missing: Vec<String> = Self::REQUIRED
            .iter()
            .filter(|key| read(key).is_none())
            .map(|key| key.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(SymposiumError::MissingCredentials(missing));
        }

        let get = |key: &str| {
            read(key).ok_or_else(|| SymposiumError::MissingCredentials(vec![key.to_string()]))
        };

        Ok(Self {
            openai_api_key: ApiKey::new(get(Self::OPENAI_API_KEY)?),
            judgment_api_key: ApiKey::new(get(Self::JUDGMENT_API_KEY)?),
            judgment_org_id: get(Self::JUDGMENT_ORG_ID)?,
        })
    }

    /// Presence of each required variable, for diagnostics
    pub fn presence(lookup: impl Fn(&str) -> Option<String>) -> Vec<(&'static str, bool)> {
        Self::REQUIRED
            .iter()
            .map(|key| (*key, lookup(key).is_some_and(|v| !v.trim().is_empty())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = SymposiumConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.research.max_subtopics, 3);
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.evaluation.faithfulness_threshold, 0.7);
        assert_eq!(config.evaluation.relevancy_threshold, 0.6);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = SymposiumConfig::default();
        config.evaluation.relevancy_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("evaluation.relevancy_threshold"));
    }

    #[test]
    fn test_validate_rejects_zero_subtopics() {
        let mut config = SymposiumConfig::default();
        config.research.max_subtopics = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_credentials_all_missing() {
        let err = Credentials::from_lookup(lookup_from(&[])).unwrap_err();
        match err {
            SymposiumError::MissingCredentials(keys) => {
                assert_eq!(keys, vec!["OPENAI_API_KEY", "JUDGMENT_API_KEY", "JUDGMENT_ORG_ID"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_credentials_blank_counts_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("JUDGMENT_API_KEY", "   "),
            ("JUDGMENT_ORG_ID", "org"),
        ]))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: JUDGMENT_API_KEY"
        );
    }

    #[test]
    fn test_credentials_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("JUDGMENT_API_KEY", "jk-test"),
            ("JUDGMENT_ORG_ID", "org-1"),
        ]))
        .unwrap();
        assert_eq!(creds.openai_api_key.expose(), "sk-test");
        assert_eq!(creds.judgment_org_id, "org-1");
        assert!(!format!("{:?}", creds).contains("sk-test"));
    }

    #[test]
    fn test_presence_report() {
        let presence = Credentials::presence(lookup_from(&[("OPENAI_API_KEY", "sk")]));
        assert_eq!(
            presence,
            vec![
                ("OPENAI_API_KEY", true),
                ("JUDGMENT_API_KEY", false),
                ("JUDGMENT_ORG_ID", false)
            ]
        );
    }

    #[test]
    fn test_load_layers_file_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "symposium.toml",
                r#"
                [llm]
                model = "gpt-4o-mini"

                [research]
                max_subtopics = 5
                "#,
            )?;
            jail.set_env("SYMPOSIUM_RESEARCH__MAX_SUBTOPICS", "2");
            jail.set_env("OPENAI_BASE_URL", "http://localhost:8080/v1");

            let config = SymposiumConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.llm.model, "gpt-4o-mini");
            assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
            assert_eq!(config.research.max_subtopics, 2);
            assert_eq!(config.research.planner_max_tokens, 200);
            Ok(())
        });
    }

    #[test]
    fn test_load_with_missing_explicit_file() {
        figment::Jail::expect_with(|_jail| {
            let err = SymposiumConfig::load_with(Some("does-not-exist.toml")).unwrap_err();
            assert!(err.is_configuration());
            Ok(())
        });
    }

    #[test]
    fn test_retry_durations_parse_humantime() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [retry]
                max_attempts = 5
                initial_delay = "250ms"
                max_delay = "10s"
                "#,
            )?;
            let config = SymposiumConfig::from_file("custom.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.retry.max_attempts, 5);
            assert_eq!(config.retry.initial_delay, Duration::from_millis(250));
            assert_eq!(config.retry.max_delay, Duration::from_secs(10));
            Ok(())
        });
    }
}
