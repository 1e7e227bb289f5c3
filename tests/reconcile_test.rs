//! Tests for the cron and fcron reconciliation strategies.

use cronwatch::extract::LogEvent;
use cronwatch::reconcile::{
    CronReconciler, DeclaredJob, FcronReconciler, Reconciler, FAILURE_DETECTED_LABEL,
    NO_CRONTAB_LABEL, NO_FCRON_ACTIVITY_LABEL,
};
use cronwatch::report::Status;

fn events(lines: &[&str]) -> Vec<LogEvent> {
    lines.iter().map(|l| LogEvent::parse(l)).collect()
}

fn jobs(lines: &[&str]) -> Vec<DeclaredJob> {
    lines.iter().map(|l| DeclaredJob::parse(l)).collect()
}

// ---------------------------------------------------------------------------
// Command label
// ---------------------------------------------------------------------------

#[test]
fn command_label_skips_five_schedule_fields() {
    let job = DeclaredJob::parse("*/5 * * * * /usr/bin/backup.sh --full  --quiet");
    assert_eq!(job.command_label(), "/usr/bin/backup.sh --full --quiet");
}

#[test]
fn command_label_of_short_line_is_empty() {
    assert_eq!(DeclaredJob::parse("* * * *").command_label(), "");
    assert_eq!(DeclaredJob::parse("").command_label(), "");
}

#[test]
fn command_label_of_macro_line_loses_tokens() {
    // Shortcut schedules are not understood; the first command tokens are eaten.
    let job = DeclaredJob::parse("@daily /usr/bin/a b c d e");
    assert_eq!(job.command_label(), "e");
}

// ---------------------------------------------------------------------------
// Cron flavor
// ---------------------------------------------------------------------------

#[test]
fn cron_declared_job_found_in_log_is_success() {
    let reconciler = CronReconciler::new(10);
    let entries = reconciler.reconcile(
        &jobs(&["*/5 * * * * /usr/bin/backup.sh"]),
        &events(&["CRON[123]: (root) CMD (/usr/bin/backup.sh)"]),
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].job_label, "/usr/bin/backup.sh");
    assert_eq!(entries[0].status, Status::Success);
    assert_eq!(entries[0].message, "Ran successfully in last 10 minutes.");
}

#[test]
fn cron_jobs_without_events_are_all_missing() {
    let reconciler = CronReconciler::new(10);
    let entries = reconciler.reconcile(
        &jobs(&["0 * * * * /bin/a", "30 2 * * 1 /bin/b --flag"]),
        &[],
    );

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.status == Status::Missing));
    assert_eq!(entries[1].job_label, "/bin/b --flag");
    assert_eq!(entries[1].message, "Did **not run** (but scheduled).");
}

#[test]
fn cron_match_is_substring_containment() {
    let reconciler = CronReconciler::new(5);
    let entries = reconciler.reconcile(
        &jobs(&["* * * * * backup"]),
        &events(&["CRON[1]: (root) CMD (/usr/local/bin/backup-nightly)"]),
    );

    assert_eq!(entries[0].status, Status::Success);
}

#[test]
fn cron_no_declared_jobs_yields_synthetic_entry() {
    let entries = CronReconciler::new(10).reconcile(&[], &[]);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].job_label, NO_CRONTAB_LABEL);
    assert_eq!(entries[0].status, Status::Missing);
}

#[test]
fn cron_failures_are_additive_to_job_entries() {
    let line = "CRON[7]: (root) CMD (job1) EXIT STATUS (1)";
    let entries = CronReconciler::new(10).reconcile(&jobs(&["* * * * * job1"]), &events(&[line]));

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].job_label, "job1");
    assert_eq!(entries[0].status, Status::Success);
    assert_eq!(entries[1].job_label, FAILURE_DETECTED_LABEL);
    assert_eq!(entries[1].status, Status::Failed);
    assert!(entries[1].message.contains(line));
}

#[test]
fn cron_each_failing_line_gets_its_own_entry() {
    let entries = CronReconciler::new(10).reconcile(
        &[],
        &events(&[
            "CRON[1]: CMD (a) EXIT STATUS (2)",
            "CRON[2]: CMD (a) EXIT STATUS (0)",
            "CRON[3]: CMD (a) EXIT STATUS (2)",
        ]),
    );

    // Synthetic no-crontab entry plus two failures, no deduplication.
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].job_label, NO_CRONTAB_LABEL);
    assert!(entries[1..].iter().all(|e| e.status == Status::Failed));
    assert!(entries[1].message.contains("CRON[1]"));
    assert!(entries[2].message.contains("CRON[3]"));
}

// ---------------------------------------------------------------------------
// Fcron flavor
// ---------------------------------------------------------------------------

#[test]
fn fcron_empty_events_yield_no_activity_entry() {
    let entries = FcronReconciler.reconcile(&[], &[]);

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].job_label, NO_FCRON_ACTIVITY_LABEL);
    assert_eq!(entries[0].status, Status::Missing);
}

#[test]
fn fcron_classifies_by_exit_status() {
    let entries = FcronReconciler.reconcile(
        &[],
        &events(&[
            "fcron[1]: CMD (ok-job) EXIT STATUS (0)",
            "fcron[2]: CMD (bad-job) EXIT STATUS (7)",
            "fcron[3]: CMD (quiet-job) started",
        ]),
    );

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].status, Status::Success);
    assert_eq!(entries[0].message, "Ran successfully.");
    assert_eq!(entries[1].job_label, "bad-job");
    assert_eq!(entries[1].status, Status::Failed);
    assert!(entries[1].message.contains("EXIT STATUS (7)"));
    assert_eq!(entries[2].job_label, "quiet-job");
    assert_eq!(entries[2].status, Status::Success);
}

#[test]
fn fcron_oversized_exit_status_is_failed() {
    let entries = FcronReconciler.reconcile(
        &[],
        &events(&["fcron[1]: CMD (big) EXIT STATUS (4294967296)"]),
    );

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].job_label, "big");
    assert_eq!(entries[0].status, Status::Failed);
    assert!(entries[0].message.contains("EXIT STATUS (4294967296)"));
}

#[test]
fn fcron_zero_padded_exit_status_is_success() {
    let entries = FcronReconciler.reconcile(
        &[],
        &events(&[
            "fcron[1]: CMD (padded) EXIT STATUS (00)",
            "fcron[2]: CMD (padded-bad) EXIT STATUS (01)",
        ]),
    );

    assert_eq!(entries[0].status, Status::Success);
    assert_eq!(entries[1].status, Status::Failed);
}

#[test]
fn fcron_keeps_one_entry_per_event() {
    let entries = FcronReconciler.reconcile(
        &[],
        &events(&["fcron[1]: job started", "fcron[1]: job started"]),
    );

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.job_label == "Unknown job"));
}

#[test]
fn fcron_ignores_declared_jobs() {
    let entries = FcronReconciler.reconcile(&jobs(&["* * * * * /bin/a"]), &[]);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].job_label, NO_FCRON_ACTIVITY_LABEL);
}
