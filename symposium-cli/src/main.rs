//! Symposium CLI - run the multi-agent research pipeline

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use symposium_core::config::{Credentials, SymposiumConfig};
use symposium_core::runner::{RunOptions, Runner};
use symposium_core::trace::TraceFormat;

mod output;

#[derive(Parser)]
#[command(name = "symposium")]
#[command(about = "Multi-agent research with Judgment tracing and evaluation", long_about = None)]
#[command(version)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a question and evaluate the report
    Run(RunArgs),
    /// Show the effective configuration and which credentials are set
    Config {
        /// Extra TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Load environment variables from this file instead of `.env`
        #[arg(long)]
        env_file: Option<PathBuf>,
    },
    /// Version information
    Version,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Question to research (defaults to `research.question`)
    #[arg(short, long)]
    question: Option<String>,

    /// Extra TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load environment variables from this file instead of `.env`
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Skip the Judgment evaluation
    #[arg(long)]
    no_evaluate: bool,

    /// Also append every trace as a JSON line to this file
    #[arg(long)]
    trace_out: Option<PathBuf>,

    /// Print every recorded trace (text format only)
    #[arg(long)]
    show_traces: bool,

    /// How `--show-traces` renders each trace
    #[arg(long, value_enum, default_value_t = TraceOutput::Summary)]
    trace_format: TraceOutput,

    /// Report output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TraceOutput {
    Summary,
    Json,
    JsonPretty,
}

impl From<TraceOutput> for TraceFormat {
    fn from(output: TraceOutput) -> Self {
        match output {
            TraceOutput::Summary => TraceFormat::Summary,
            TraceOutput::Json => TraceFormat::Json,
            TraceOutput::JsonPretty => TraceFormat::JsonPretty,
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Load `.env` (or the given file) without overriding variables already set
fn load_env_file(path: Option<&PathBuf>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Failed to load environment file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    load_env_file(args.env_file.as_ref())?;

    let config = SymposiumConfig::load_with(args.config.as_deref())
        .context("Failed to load configuration")?;

    let question = args
        .question
        .clone()
        .unwrap_or_else(|| config.research.question.clone());

    tracing::debug!(
        model = %config.llm.model,
        evaluation = config.evaluation.enabled && !args.no_evaluate,
        "Configuration loaded"
    );

    let options = RunOptions {
        trace_out: args.trace_out.clone(),
        skip_evaluation: args.no_evaluate,
    };
    let runner =
        Runner::from_env(config, options).context("Failed to initialize research runner")?;

    if args.format == OutputFormat::Text {
        output::print_banner();
    }

    let outcome = runner.run(&question).await;
    tracing::info!(
        traces = outcome.traces.len(),
        tokens = outcome.usage.total_tokens,
        "Run finished"
    );

    match args.format {
        OutputFormat::Text => {
            output::print_outcome(&outcome);
            if args.show_traces {
                output::print_traces(&outcome.traces, args.trace_format.into())?;
            }
        }
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize run outcome")?
        ),
    }

    Ok(())
}

fn show_config(config_path: Option<PathBuf>, env_file: Option<PathBuf>) -> Result<()> {
    load_env_file(env_file.as_ref())?;

    let config = SymposiumConfig::load_with(config_path.as_deref())
        .context("Failed to load configuration")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?
    );

    println!();
    println!("Credentials:");
    for (key, present) in Credentials::presence(|key| std::env::var(key).ok()) {
        println!("  {}: {}", key, if present { "set" } else { "missing" });
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    match cli.command {
        Commands::Run(args) => run(args).await?,
        Commands::Config { config, env_file } => show_config(config, env_file)?,
        Commands::Version => {
            println!("symposium {}", env!("CARGO_PKG_VERSION"));
            println!("symposium-core {}", symposium_core::VERSION);
        }
    }

    Ok(())
}
