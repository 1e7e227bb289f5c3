//! Scheduler flavor selection.
//!
//! A [`Flavor`] decides which log lines count as scheduler activity, which
//! reconciliation strategy runs, and how the outgoing report is labelled.

use serde::{Deserialize, Serialize};

use crate::reconcile::{CronReconciler, FcronReconciler, Reconciler};

/// Tokens that mark a line as cron-family activity (case-sensitive).
const CRON_TOKENS: [&str; 3] = ["CRON", "cron", "fcron"];

/// Which scheduler implementation governs extraction and reconciliation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// Vixie cron / cronie: declared jobs come from `crontab -l`.
    #[default]
    Cron,
    /// fcron: no declared schedule, every logged run is classified directly.
    Fcron,
}

impl Flavor {
    /// Whether a raw log line is scheduler activity for this flavor.
    ///
    /// Cron matches the literal tokens `CRON`, `cron` or `fcron`; fcron
    /// matches `fcron` in any letter case.
    pub fn is_relevant(self, line: &str) -> bool {
        match self {
            Self::Cron => CRON_TOKENS.iter().any(|token| line.contains(token)),
            Self::Fcron => line.to_lowercase().contains("fcron"),
        }
    }

    /// Whether this flavor reconciles against a declared schedule.
    pub fn uses_schedule(self) -> bool {
        matches!(self, Self::Cron)
    }

    /// Embed title for reports of this flavor.
    pub fn title(self) -> &'static str {
        match self {
            Self::Cron => "\u{1f552} Cron/Fcron Monitor Report",
            Self::Fcron => "\u{1f552} Fcron Monitor Report",
        }
    }

    /// Footer tag identifying which monitor produced the report.
    pub fn footer_tag(self) -> &'static str {
        match self {
            Self::Cron => "cron-monitor",
            Self::Fcron => "fcron-monitor",
        }
    }

    /// Reconciliation strategy for this flavor.
    pub fn reconciler(self, window_minutes: u32) -> Box<dyn Reconciler> {
        match self {
            Self::Cron => Box::new(CronReconciler::new(window_minutes)),
            Self::Fcron => Box::new(FcronReconciler),
        }
    }
}

impl std::fmt::Display for Flavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cron => f.write_str("cron"),
            Self::Fcron => f.write_str("fcron"),
        }
    }
}
