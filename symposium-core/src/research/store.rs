//! In-memory store of findings for one run

use std::sync::Mutex;

use super::report::Finding;

/// Append-only list of findings
#[derive(Debug, Default)]
pub struct ResearchStore {
    findings: Mutex<Vec<Finding>>,
}

impl ResearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding
    pub fn store(&self, finding: Finding) -> bool {
        tracing::info!(agent_id = finding.agent_id, topic = %finding.topic, "Stored research");
        self.findings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(finding);
        true
    }

    pub fn findings(&self) -> Vec<Finding> {
        self.findings
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.findings.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
