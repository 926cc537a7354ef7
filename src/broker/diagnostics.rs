//! Per-attempt diagnostics reporting
//!
//! Every fetch attempt ends with exactly one call into the diagnostics sink,
//! so successes and failures stay observably distinguishable even though the
//! fetcher swallows errors into retries.

use crate::FetchError;
use std::io::Write;
use std::sync::Mutex;

/// Receives the outcome of every fetch attempt
pub trait DiagnosticsSink: Send + Sync {
    /// Called once per successful attempt
    fn record_success(&self, url: &str);

    /// Called once per failed attempt, before the retry is scheduled
    fn record_failure(&self, url: &str, error: &FetchError);
}

/// Sink for interactive use: a `+` or `-` marker per attempt on stdout,
/// failure detail on the log
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleDiagnostics;

impl DiagnosticsSink for ConsoleDiagnostics {
    fn record_success(&self, url: &str) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"+");
        let _ = stdout.flush();
        tracing::debug!("fetched {}", url);
    }

    fn record_failure(&self, url: &str, error: &FetchError) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(b"-");
        let _ = stdout.flush();
        tracing::warn!("Error occurred while requesting {}: {}", url, error);
    }
}

/// A recorded attempt outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    Success { url: String },
    Failure { url: String, error: String },
}

/// Sink that records attempts in memory
///
/// Useful for embedders that aggregate attempt statistics, and for tests
/// asserting on the exact success/failure sequence.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    attempts: Mutex<Vec<Attempt>>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded attempts, in order
    pub fn attempts(&self) -> Vec<Attempt> {
        self.attempts.lock().expect("diagnostics lock").clone()
    }

    /// Number of successful attempts recorded
    pub fn success_count(&self) -> usize {
        self.attempts()
            .iter()
            .filter(|attempt| matches!(attempt, Attempt::Success { .. }))
            .count()
    }

    /// Number of failed attempts recorded
    pub fn failure_count(&self) -> usize {
        self.attempts()
            .iter()
            .filter(|attempt| matches!(attempt, Attempt::Failure { .. }))
            .count()
    }
}

impl DiagnosticsSink for MemoryDiagnostics {
    fn record_success(&self, url: &str) {
        self.attempts
            .lock()
            .expect("diagnostics lock")
            .push(Attempt::Success {
                url: url.to_string(),
            });
    }

    fn record_failure(&self, url: &str, error: &FetchError) {
        self.attempts
            .lock()
            .expect("diagnostics lock")
            .push(Attempt::Failure {
                url: url.to_string(),
                error: error.to_string(),
            });
    }
}
