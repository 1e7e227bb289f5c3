//! Report entries, statuses and overall severity.

use serde::{Deserialize, Serialize};

/// Outcome of one job or one logged run.
///
/// Variants are ordered by severity, so the overall severity of a report is
/// the maximum over its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The job ran (or an event reported a clean exit).
    Success,
    /// A declared job left no trace in the window, or there was nothing to check.
    Missing,
    /// A log line reported a non-zero exit.
    Failed,
}

impl Status {
    /// Glyph prefixed to the entry label in notifications.
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Success => "\u{2705}",
            Self::Missing => "\u{26a0}\u{fe0f}",
            Self::Failed => "\u{274c}",
        }
    }

    /// Embed color (`0xRRGGBB`); red for failures.
    pub fn color(self) -> u32 {
        match self {
            Self::Success => 0x2E_CC_71,
            Self::Missing => 0xE6_7E_22,
            Self::Failed => 0xE7_4C_3C,
        }
    }
}

/// One line item of the outgoing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    /// Command label, job identifier, or a synthetic label.
    pub job_label: String,
    /// Classified outcome.
    pub status: Status,
    /// Human-readable explanation (may embed a raw log line).
    pub message: String,
}

impl ReportEntry {
    /// Create an entry.
    pub fn new(job_label: impl Into<String>, status: Status, message: impl Into<String>) -> Self {
        Self {
            job_label: job_label.into(),
            status,
            message: message.into(),
        }
    }
}

/// Consolidated result of one monitoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Entries in discovery order.
    pub entries: Vec<ReportEntry>,
    /// Failed if any entry failed, else Missing if any is missing, else Success.
    pub overall_severity: Status,
}

impl Report {
    /// Aggregate entries into a report. An empty list is vacuously a success.
    pub fn build(entries: Vec<ReportEntry>) -> Self {
        let overall_severity = entries
            .iter()
            .map(|entry| entry.status)
            .max()
            .unwrap_or(Status::Success);
        Self {
            entries,
            overall_severity,
        }
    }

    /// Number of entries with the given status.
    pub fn count(&self, status: Status) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}
