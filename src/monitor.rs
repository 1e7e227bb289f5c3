//! One run-to-completion monitoring pass.

use tracing::{debug, info};

use crate::config::CronwatchConfig;
use crate::extract::extract_events;
use crate::flavor::Flavor;
use crate::notifier::{build_payload, WebhookPayload};
use crate::reconcile::DeclaredJob;
use crate::report::{Report, Status};
use crate::sources::{CommandRunner, LogSource, ScheduleSource};

/// Core pipeline without I/O: extract, reconcile, aggregate.
pub fn evaluate<S: AsRef<str>>(
    flavor: Flavor,
    window_minutes: u32,
    jobs: &[DeclaredJob],
    lines: &[S],
) -> Report {
    let events = extract_events(lines, flavor);
    let entries = flavor.reconciler(window_minutes).reconcile(jobs, &events);
    Report::build(entries)
}

/// Gathers sources for one flavor and builds its report.
pub struct Monitor<'a, R: CommandRunner + ?Sized> {
    config: &'a CronwatchConfig,
    flavor: Flavor,
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> Monitor<'a, R> {
    /// Create a monitor. Nothing runs until [`Monitor::report`].
    pub fn new(config: &'a CronwatchConfig, flavor: Flavor, runner: &'a R) -> Self {
        Self {
            config,
            flavor,
            runner,
        }
    }

    /// Read the schedule (cron flavor only) and logs, then reconcile.
    pub async fn report(&self) -> Report {
        let window = self.config.window_minutes;

        let jobs = if self.flavor.uses_schedule() {
            ScheduleSource::new(self.runner).declared_jobs().await
        } else {
            Vec::new()
        };

        let lines = LogSource::new(self.runner, &self.config.sources, window)
            .collect(self.flavor)
            .await;
        debug!(jobs = jobs.len(), lines = lines.len(), "sources collected");

        let report = evaluate(self.flavor, window, &jobs, &lines);
        info!(
            flavor = %self.flavor,
            entries = report.entries.len(),
            succeeded = report.count(Status::Success),
            missing = report.count(Status::Missing),
            failed = report.count(Status::Failed),
            severity = ?report.overall_severity,
            "report built"
        );
        report
    }

    /// Payload for `report`, stamped with the current local time.
    pub fn payload(&self, report: &Report) -> WebhookPayload {
        build_payload(
            report,
            self.flavor,
            self.config.window_minutes,
            &chrono::Local::now(),
        )
    }
}
