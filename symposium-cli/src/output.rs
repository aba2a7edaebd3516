//! Human-readable run output

use symposium_core::research::EvaluationSummary;
use symposium_core::runner::RunOutcome;
use anyhow::{Context, Result};
use symposium_core::trace::{TraceExporter, TraceFormat, TraceReport};

const RULE: &str = "==================================================";

pub fn print_banner() {
    println!("Starting Multi-Agent Research System");
    println!("{}", RULE);
}

pub fn print_outcome(outcome: &RunOutcome) {
    let report = &outcome.report;

    println!();
    println!("Research Complete!");
    println!("{}", RULE);
    println!("Question: {}", report.research_question);
    println!("Agents Used: {}", report.total_agents_used);
    println!("Subtopics: {:?}", report.subtopics);
    println!();
    println!("Final Synthesis:");
    println!("{}", report.final_synthesis);

    println!();
    println!(
        "Traces: {} ({} LLM calls, {} tokens, est. ${:.6})",
        outcome.traces.len(),
        outcome.usage.llm_calls,
        outcome.usage.total_tokens,
        outcome.usage.estimated_cost_usd
    );

    if let Some(evaluation) = &outcome.evaluation {
        print_evaluation(evaluation);
    }
}

fn print_evaluation(evaluation: &EvaluationSummary) {
    println!();
    println!("Evaluation Results:");
    println!("{}", RULE);

    if let Some(error) = &evaluation.error {
        println!("Evaluation failed: {}", error);
        return;
    }

    for (name, score) in &evaluation.scores {
        match score {
            Some(score) => println!("{}: {}", name, score),
            None => println!("{}: n/a", name),
        }
    }

    if !evaluation.evaluation_success {
        println!("One or more scorers did not meet their threshold");
    }
}

pub fn print_traces(traces: &[TraceReport], format: TraceFormat) -> Result<()> {
    for trace in traces {
        let rendered = TraceExporter::export(trace, format)
            .with_context(|| format!("Failed to export trace {}", trace.trace_id))?;
        if format != TraceFormat::Json {
            println!();
        }
        println!("{}", rendered);
    }
    Ok(())
}
