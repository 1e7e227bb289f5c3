//! Cronwatch — scheduled-job execution monitor.
//!
//! Cross-references the declared crontab against recent cron/fcron log
//! lines, classifies each job as succeeded, missing or failed, and sends a
//! single consolidated report to a webhook. It only observes; it never
//! schedules or runs jobs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Configuration loading and validation.
pub mod config;
/// Log line filtering and field tokenizers.
pub mod extract;
/// Cron vs fcron selection.
pub mod flavor;
/// Tracing subscriber setup.
pub mod logging;
/// One monitoring pass from sources to report.
pub mod monitor;
/// Webhook payload and delivery.
pub mod notifier;
/// Reconciliation strategies.
pub mod reconcile;
/// Report entries and severity.
pub mod report;
/// Crontab, journal and log file adapters.
pub mod sources;
