//! Report quality evaluation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::report::ResearchReport;
use crate::config::EvaluationSettings;
use crate::judgment::{EvaluationRequest, EvaluationService, Example, ScorerConfig, ScorerData};

/// Outcome of evaluating one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    /// True when every scorer passed
    pub evaluation_success: bool,
    /// Scorer name to score; `None` when the scorer produced no score
    #[serde(default)]
    pub scores: BTreeMap<String, Option<f64>>,
    #[serde(default)]
    pub details: Vec<ScorerData>,
    /// Set when the evaluation itself could not be run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationSummary {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            evaluation_success: false,
            scores: BTreeMap::new(),
            details: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Build the evaluation request for a report
pub fn evaluation_request(
    report: &ResearchReport,
    settings: &EvaluationSettings,
) -> EvaluationRequest {
    let example = Example::new(&report.research_question, &report.final_synthesis)
        .with_retrieval_context(report.retrieval_context());

    let scorers = vec![
        ScorerConfig::faithfulness(settings.faithfulness_threshold),
        ScorerConfig::answer_relevancy(settings.relevancy_threshold),
    ];

    let request =
        EvaluationRequest::new(vec![example], scorers, &settings.model, &settings.project_name);
    match &settings.eval_name {
        Some(name) => request.with_eval_name(name),
        None => request,
    }
}

/// Score the report's synthesis against its question and findings.
///
/// Never fails: service errors are reported in the summary.
pub async fn evaluate_research_quality(
    service: &dyn EvaluationService,
    report: &ResearchReport,
    settings: &EvaluationSettings,
) -> EvaluationSummary {
    tracing::info!("Evaluating research quality");

    let request = evaluation_request(report, settings);
    let results = match service.run_evaluation(&request).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!(error = %e, "Evaluation failed");
            return EvaluationSummary::failed(e.to_string());
        }
    };

    let Some(result) = results.into_iter().next() else {
        return EvaluationSummary::failed("Evaluation returned no results");
    };

    let scores = result
        .scorers_data
        .iter()
        .map(|s| (s.name.clone(), s.score))
        .collect();

    EvaluationSummary {
        evaluation_success: result.success,
        scores,
        error: result.first_error().map(String::from),
        details: result.scorers_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SymposiumError};
    use crate::judgment::ScoringResult;
    use crate::research::Finding;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingService {
        reply: Option<Vec<ScoringResult>>,
        seen: Mutex<Option<EvaluationRequest>>,
    }

    #[async_trait]
    impl EvaluationService for RecordingService {
        async fn run_evaluation(&self, request: &EvaluationRequest) -> Result<Vec<ScoringResult>> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.reply.clone().ok_or(SymposiumError::Judgment {
                status: 401,
                message: "invalid organization".to_string(),
            })
        }
    }

    fn report() -> ResearchReport {
        let finding = Finding {
            agent_id: 1,
            topic: "Solar".to_string(),
            findings: "Solar is cheap".to_string(),
            sources: vec!["source1.com".to_string()],
            search_query: "Solar research analysis".to_string(),
        };
        ResearchReport::new("Why solar?", vec!["Solar".to_string()], vec![finding], "Because.")
    }

    fn scorer(name: &str, score: f64, threshold: f64) -> ScorerData {
        ScorerData {
            name: name.to_string(),
            threshold,
            success: score >= threshold,
            score: Some(score),
            reason: None,
            error: None,
        }
    }

    #[tokio::test]
    async fn test_successful_evaluation() {
        let service = RecordingService {
            reply: Some(vec![ScoringResult {
                success: true,
                scorers_data: vec![
                    scorer("Faithfulness", 0.9, 0.7),
                    scorer("Answer Relevancy", 0.8, 0.6),
                ],
                data_object: None,
            }]),
            seen: Mutex::new(None),
        };

        let summary =
            evaluate_research_quality(&service, &report(), &EvaluationSettings::default()).await;

        assert!(summary.evaluation_success);
        assert_eq!(summary.scores["Faithfulness"], Some(0.9));
        assert_eq!(summary.scores["Answer Relevancy"], Some(0.8));
        assert!(summary.error.is_none());

        let request = service.seen.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "gpt-3.5-turbo");
        assert_eq!(request.project_name, "multi_agent_research_eval");
        assert_eq!(request.examples[0].input, "Why solar?");
        assert_eq!(request.examples[0].actual_output, "Because.");
        assert_eq!(request.examples[0].retrieval_context, vec!["Solar is cheap"]);
        assert_eq!(request.scorers[0].threshold, 0.7);
        assert_eq!(request.scorers[1].threshold, 0.6);
        assert!(request.eval_name.starts_with("eval-"));
    }

    #[test]
    fn test_configured_eval_name() {
        let settings = EvaluationSettings {
            eval_name: Some("nightly-energy".to_string()),
            ..Default::default()
        };
        let request = evaluation_request(&report(), &settings);
        assert_eq!(request.eval_name, "nightly-energy");
    }

    #[tokio::test]
    async fn test_service_error_reported() {
        let service = RecordingService {
            reply: None,
            seen: Mutex::new(None),
        };

        let summary =
            evaluate_research_quality(&service, &report(), &EvaluationSettings::default()).await;

        assert!(!summary.evaluation_success);
        assert!(summary.error.unwrap().contains("invalid organization"));
    }

    #[tokio::test]
    async fn test_empty_results_reported() {
        let service = RecordingService {
            reply: Some(Vec::new()),
            seen: Mutex::new(None),
        };

        let summary =
            evaluate_research_quality(&service, &report(), &EvaluationSettings::default()).await;
        assert_eq!(summary.error.as_deref(), Some("Evaluation returned no results"));
    }
}
