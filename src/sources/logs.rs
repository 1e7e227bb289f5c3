//! Recent scheduler log lines from the journal or plain log files.
//!
//! File reads use synchronous `std::fs` since these are quick local
//! operations on a one-shot run.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CommandRunner, SourceError};
use crate::config::SourcesConfig;
use crate::flavor::Flavor;

/// Scheduler units probed in order; the first active one is queried.
pub const SCHEDULER_UNITS: [&str; 3] = ["cron.service", "crond.service", "fcron.service"];

/// Unit always queried by the fcron flavor.
pub const FCRON_UNIT: &str = "fcron.service";

/// Collects raw log lines for a fixed time window.
pub struct LogSource<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    sources: &'a SourcesConfig,
    window_minutes: u32,
}

impl<'a, R: CommandRunner + ?Sized> LogSource<'a, R> {
    /// Create a log source for the last `window_minutes` minutes.
    pub fn new(runner: &'a R, sources: &'a SourcesConfig, window_minutes: u32) -> Self {
        Self {
            runner,
            sources,
            window_minutes,
        }
    }

    /// Raw lines for the given flavor, in source order.
    pub async fn collect(&self, flavor: Flavor) -> Vec<String> {
        match flavor {
            Flavor::Cron => self.cron_lines().await,
            Flavor::Fcron => self.fcron_lines().await,
        }
    }

    /// First active scheduler unit among [`SCHEDULER_UNITS`], if any.
    pub async fn detect_scheduler(&self) -> Option<&'static str> {
        for unit in SCHEDULER_UNITS {
            match self
                .runner
                .run("systemctl", &["is-active", "--quiet", unit])
                .await
            {
                Ok(output) if output.success() => return Some(unit),
                Ok(_) => continue,
                Err(SourceError::ToolUnavailable { .. }) => {
                    debug!("systemctl not available, skipping scheduler probe");
                    return None;
                }
                Err(e) => {
                    debug!(unit, error = %e, "scheduler probe failed");
                }
            }
        }
        None
    }

    /// Journal lines of `unit` since the start of the window.
    ///
    /// # Errors
    ///
    /// Returns an error if `journalctl` is missing, fails to start, or
    /// exits unsuccessfully.
    pub async fn journal(&self, unit: &str) -> Result<Vec<String>, SourceError> {
        let since = format!("{}m ago", self.window_minutes);
        let output = self
            .runner
            .run("journalctl", &["-u", unit, "--since", since.as_str(), "--no-pager"])
            .await?
            .require_success("journalctl")?;
        Ok(output.stdout.lines().map(str::to_owned).collect())
    }

    /// Cron flavor: the active unit's journal, or else the tails of every
    /// readable fallback file.
    async fn cron_lines(&self) -> Vec<String> {
        if let Some(unit) = self.detect_scheduler().await {
            match self.journal(unit).await {
                Ok(lines) => return lines,
                Err(e) => debug!(unit, error = %e, "journal query failed, falling back to log files"),
            }
        }
        self.tail_all(&self.sources.cron_fallback_logs)
    }

    /// Fcron flavor: the fcron journal followed by the fcron log tail.
    async fn fcron_lines(&self) -> Vec<String> {
        let mut lines = match self.journal(FCRON_UNIT).await {
            Ok(lines) => lines,
            Err(e) => {
                debug!(error = %e, "fcron journal query failed");
                Vec::new()
            }
        };
        lines.extend(self.tail_all(std::slice::from_ref(&self.sources.fcron_fallback_log)));
        lines
    }

    /// Concatenate the tails of all readable files; unreadable ones are skipped.
    fn tail_all(&self, paths: &[PathBuf]) -> Vec<String> {
        let mut lines = Vec::new();
        for path in paths {
            if !path.exists() {
                continue;
            }
            match tail_file(path, self.sources.tail_lines) {
                Ok(tail) => lines.extend(tail),
                Err(e) => debug!(error = %e, "skipping unreadable log file"),
            }
        }
        lines
    }
}

/// Last `max_lines` lines of a file. Invalid UTF-8 is replaced, not fatal.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn tail_file(path: &Path, max_lines: usize) -> Result<Vec<String>, SourceError> {
    let bytes = std::fs::read(path).map_err(|source| SourceError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<&str> = text.lines().collect();
    let skip = lines.len().saturating_sub(max_lines);
    Ok(lines.into_iter().skip(skip).map(str::to_owned).collect())
}
