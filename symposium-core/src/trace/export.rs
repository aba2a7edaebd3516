//! Trace export

use super::report::TraceReport;

/// Export format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    /// JSON format
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Compact summary
    Summary,
}

/// Trace exporter
pub struct TraceExporter;

impl TraceExporter {
    /// Export to JSON
    pub fn to_json(report: &TraceReport) -> Result<String, serde_json::Error> {
        serde_json::to_string(report)
    }

    /// Export to pretty JSON
    pub fn to_json_pretty(report: &TraceReport) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(report)
    }

    /// Export to a human-readable summary with an indented span tree
    pub fn to_summary(report: &TraceReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Trace: {} ({})", report.name, report.project_name));
        lines.push(format!("ID: {}", report.trace_id));
        lines.push(format!(
            "Status: {}",
            if report.success { "SUCCESS" } else { "FAILED" }
        ));
        if let Some(ref error) = report.error {
            lines.push(format!("Error: {}", error));
        }
        lines.push(format!("Duration: {}ms", report.duration_ms));

        lines.push(String::new());
        lines.push("Spans:".to_string());
        for span in &report.spans {
            let status = if span.succeeded() { "ok" } else { "error" };
            lines.push(format!(
                "  {}[{}] {} {}ms {}",
                "  ".repeat(span.depth),
                span.span_type,
                span.name,
                span.duration_ms,
                status
            ));
        }

        let summary = &report.summary;
        lines.push(String::new());
        lines.push("Token Usage:".to_string());
        lines.push(format!("  Prompt: {}", summary.prompt_tokens));
        lines.push(format!("  Completion: {}", summary.completion_tokens));
        lines.push(format!("  Total: {}", summary.total_tokens));
        if summary.estimated_cost_usd > 0.0 {
            lines.push(format!("  Est. Cost: ${:.6}", summary.estimated_cost_usd));
        }

        lines.join("\n")
    }

    /// Export in specified format
    pub fn export(report: &TraceReport, format: TraceFormat) -> Result<String, serde_json::Error> {
        match format {
            TraceFormat::Json => Self::to_json(report),
            TraceFormat::JsonPretty => Self::to_json_pretty(report),
            TraceFormat::Summary => Ok(Self::to_summary(report)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::report::TraceSummary;
    use crate::trace::span::{Span, SpanType};
    use chrono::Utc;

    fn sample_report() -> TraceReport {
        let now = Utc::now();
        let root = Span {
            span_id: "root".to_string(),
            trace_id: "trace-1".to_string(),
            parent_span_id: None,
            name: "research_agent".to_string(),
            span_type: SpanType::Function,
            depth: 0,
            inputs: serde_json::json!({"topic": "Solar"}),
            output: Some(serde_json::json!("done")),
            error: None,
            started_at: now,
            duration_ms: 12,
            token_usage: None,
        };
        let llm = Span {
            span_id: "llm".to_string(),
            parent_span_id: Some("root".to_string()),
            name: "openai.chat".to_string(),
            span_type: SpanType::Llm,
            depth: 1,
            error: Some("timeout".to_string()),
            ..root.clone()
        };

        TraceReport {
            trace_id: "trace-1".to_string(),
            project_name: "proj".to_string(),
            name: "research_agent".to_string(),
            started_at: now,
            completed_at: now,
            duration_ms: 12,
            spans: vec![root, llm],
            summary: TraceSummary::empty(),
            success: true,
            error: None,
        }
    }

    #[test]
    fn test_summary_format() {
        let summary = TraceExporter::to_summary(&sample_report());
        assert!(summary.contains("Trace: research_agent (proj)"));
        assert!(summary.contains("Status: SUCCESS"));
        assert!(summary.contains("  [function] research_agent 12ms ok"));
        assert!(summary.contains("    [llm] openai.chat 12ms error"));
        assert!(!summary.contains("Est. Cost"));
    }

    #[test]
    fn test_json_export_parses() {
        let json = TraceExporter::export(&sample_report(), TraceFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["trace_id"], "trace-1");
        assert_eq!(value["spans"][1]["span_type"], "llm");
    }
}
