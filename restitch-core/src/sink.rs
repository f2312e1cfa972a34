//! Diagnostic sink seam for anomaly and failure reporting
//!
//! Reconstruction and reporting never talk to a global logger. They are
//! handed a [`DiagnosticSink`] at the entry point, so embedders choose
//! where diagnostics go (tracing, a test buffer, nowhere).

use std::sync::Mutex;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Condition worth flagging that does not suppress output
    Warning,
    /// Condition that suppressed some or all output
    Error,
}

/// Receives severity-tagged diagnostic messages
pub trait DiagnosticSink {
    /// Record one diagnostic message
    fn record(&self, severity: Severity, message: &str);
}

/// Collects diagnostics in memory
///
/// Used by tests and by the verify command to count what a run produced.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded entry, in arrival order
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Number of entries recorded at the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .map(|entries| entries.iter().filter(|(s, _)| *s == severity).count())
            .unwrap_or(0)
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, severity: Severity, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((severity, message.to_string()));
        }
    }
}

/// Discards every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _severity: Severity, _message: &str) {}
}

/// Forwards diagnostics to `tracing` at the matching level
#[cfg(feature = "logging")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[cfg(feature = "logging")]
impl DiagnosticSink for TracingSink {
    fn record(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Warning => tracing::warn!("{}", message),
            Severity::Error => tracing::error!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_records_in_order() {
        let sink = MemorySink::new();
        sink.record(Severity::Error, "first");
        sink.record(Severity::Warning, "second");

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (Severity::Error, "first".to_string()));
        assert_eq!(entries[1], (Severity::Warning, "second".to_string()));
    }

    #[test]
    fn test_memory_sink_counts_by_severity() {
        let sink = MemorySink::new();
        sink.record(Severity::Error, "a");
        sink.record(Severity::Error, "b");
        sink.record(Severity::Warning, "c");

        assert_eq!(sink.count(Severity::Error), 2);
        assert_eq!(sink.count(Severity::Warning), 1);
    }

    #[test]
    fn test_null_sink_discards() {
        NullSink.record(Severity::Error, "dropped");
    }
}
