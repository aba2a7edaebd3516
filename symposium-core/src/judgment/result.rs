//! Scoring results returned by the evaluation service

use serde::{Deserialize, Serialize};

use super::example::Example;

/// Outcome of one scorer on one example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerData {
    pub name: String,
    pub threshold: f64,
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// All scorer outcomes for one example
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    /// True when every scorer passed
    pub success: bool,
    #[serde(default)]
    pub scorers_data: Vec<ScorerData>,
    #[serde(default)]
    pub data_object: Option<Example>,
}

impl ScoringResult {
    /// First scorer error, if any scorer failed to run
    pub fn first_error(&self) -> Option<&str> {
        self.scorers_data.iter().find_map(|s| s.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_result() {
        let json = r#"{
            "success": false,
            "scorers_data": [
                {"name": "Faithfulness", "threshold": 0.7, "success": true, "score": 0.9},
                {"name": "Answer Relevancy", "threshold": 0.6, "success": false, "score": null,
                 "error": "judge timed out"}
            ]
        }"#;
        let result: ScoringResult = serde_json::from_str(json).unwrap();
        assert!(!result.success);
        assert_eq!(result.scorers_data[0].score, Some(0.9));
        assert_eq!(result.first_error(), Some("judge timed out"));
        assert!(result.data_object.is_none());
    }
}
