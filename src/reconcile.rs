//! Reconciliation of declared jobs and logged runs into report entries.
//!
//! Both flavors implement [`Reconciler`]. Entry order always follows the
//! order in which jobs and events were discovered.

use crate::extract::LogEvent;
use crate::report::{ReportEntry, Status};

/// Number of leading schedule fields in a crontab line
/// (minute, hour, day-of-month, month, day-of-week).
const SCHEDULE_FIELDS: usize = 5;

/// Label of the synthetic entry when no crontab entries are declared.
pub const NO_CRONTAB_LABEL: &str = "No user crontab";

/// Label of the synthetic entry when fcron logged nothing.
pub const NO_FCRON_ACTIVITY_LABEL: &str = "No fcron activity";

/// Label of the extra entry emitted per failing cron log line.
pub const FAILURE_DETECTED_LABEL: &str = "Failure detected";

/// Message for an fcron run that exited cleanly or reported no status.
const RAN_SUCCESSFULLY: &str = "Ran successfully.";

/// One schedule-plus-command line from the user's crontab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredJob {
    /// The full line, trimmed.
    pub command_text: String,
}

impl DeclaredJob {
    /// Wrap a crontab line.
    pub fn parse(line: &str) -> Self {
        Self {
            command_text: line.trim().to_owned(),
        }
    }

    /// Command part of the line: every token after the five schedule
    /// fields, joined by single spaces.
    ///
    /// Lines with six or fewer tokens yield whatever remains, possibly the
    /// empty string. `@daily`-style shortcuts are not recognized and lose
    /// their first command tokens.
    pub fn command_label(&self) -> String {
        self.command_text
            .split_whitespace()
            .skip(SCHEDULE_FIELDS)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Strategy that turns declared jobs and extracted events into entries.
pub trait Reconciler {
    /// Produce report entries in discovery order.
    fn reconcile(&self, jobs: &[DeclaredJob], events: &[LogEvent]) -> Vec<ReportEntry>;
}

/// Cron flavor: match declared jobs against log lines, then surface every
/// line that reports a non-zero exit.
#[derive(Debug, Clone, Copy)]
pub struct CronReconciler {
    window_minutes: u32,
}

impl CronReconciler {
    /// The window is only used in human-readable messages.
    pub fn new(window_minutes: u32) -> Self {
        Self { window_minutes }
    }
}

impl Reconciler for CronReconciler {
    fn reconcile(&self, jobs: &[DeclaredJob], events: &[LogEvent]) -> Vec<ReportEntry> {
        let mut entries = Vec::with_capacity(jobs.len().max(1));

        if jobs.is_empty() {
            entries.push(ReportEntry::new(
                NO_CRONTAB_LABEL,
                Status::Missing,
                "No crontab entries found or 'crontab' command missing.",
            ));
        }

        for job in jobs {
            let label = job.command_label();
            let ran = events.iter().any(|e| e.raw_line.contains(&label));
            let entry = if ran {
                ReportEntry::new(
                    label,
                    Status::Success,
                    format!("Ran successfully in last {} minutes.", self.window_minutes),
                )
            } else {
                ReportEntry::new(label, Status::Missing, "Did **not run** (but scheduled).")
            };
            entries.push(entry);
        }

        // Additive: one entry per failing line, no deduplication.
        entries.extend(
            events
                .iter()
                .filter(|e| e.reports_failure())
                .map(|e| {
                    ReportEntry::new(FAILURE_DETECTED_LABEL, Status::Failed, fenced(&e.raw_line))
                }),
        );

        entries
    }
}

/// Fcron flavor: classify each logged run on its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct FcronReconciler;

impl Reconciler for FcronReconciler {
    fn reconcile(&self, _jobs: &[DeclaredJob], events: &[LogEvent]) -> Vec<ReportEntry> {
        if events.is_empty() {
            return vec![ReportEntry::new(
                NO_FCRON_ACTIVITY_LABEL,
                Status::Missing,
                "No fcron jobs ran in the last interval.",
            )];
        }

        events
            .iter()
            .map(|event| match event.exit_code {
                Some(code) if code != 0 => {
                    ReportEntry::new(event.job_label(), Status::Failed, fenced(&event.raw_line))
                }
                // A zero code or no status line at all counts as a clean run.
                _ => ReportEntry::new(event.job_label(), Status::Success, RAN_SUCCESSFULLY),
            })
            .collect()
    }
}

/// Wrap a raw log line in a fenced code block.
fn fenced(line: &str) -> String {
    format!("```\n{line}\n```")
}
