//! Destinations for finished traces

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;

use super::report::TraceReport;
use crate::error::{Result, SymposiumError};

/// Receives every finished trace.
#[async_trait]
pub trait TraceSink: Send + Sync {
    /// Deliver one trace.
    ///
    /// # Errors
    ///
    /// Delivery failures. Callers log them and carry on.
    async fn submit(&self, report: &TraceReport) -> Result<()>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// Discards traces
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl TraceSink for NullSink {
    async fn submit(&self, _report: &TraceReport) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Keeps traces in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<TraceReport>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<TraceReport> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TraceSink for MemorySink {
    async fn submit(&self, report: &TraceReport) -> Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(report.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Appends each trace as one JSON line to a local file
#[derive(Debug)]
pub struct JsonFileSink {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TraceSink for JsonFileSink {
    async fn submit(&self, report: &TraceReport) -> Result<()> {
        let mut line = serde_json::to_string(report)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json-file"
    }
}

/// Forwards each trace to several sinks.
///
/// Every sink is attempted; the first error is returned after all have run.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn TraceSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl TraceSink for FanoutSink {
    async fn submit(&self, report: &TraceReport) -> Result<()> {
        let mut first_error: Option<SymposiumError> = None;

        for sink in &self.sinks {
            if let Err(e) = sink.submit(report).await {
                tracing::warn!(sink = sink.name(), error = %e, "Trace sink failed");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "fanout"
    }
}
