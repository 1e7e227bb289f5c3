//! Declared jobs from the current user's crontab.

use tracing::{debug, warn};

use super::{CommandRunner, SourceError};
use crate::reconcile::DeclaredJob;

/// Program that lists the user's crontab.
const CRONTAB: &str = "crontab";

/// Reads declared jobs through `crontab -l`.
pub struct ScheduleSource<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
}

impl<'a, R: CommandRunner + ?Sized> ScheduleSource<'a, R> {
    /// Create a schedule source using the given runner.
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Declared jobs, in crontab order.
    ///
    /// A missing `crontab` binary or a user without a crontab (non-zero
    /// exit) both yield an empty list.
    pub async fn declared_jobs(&self) -> Vec<DeclaredJob> {
        match self.list().await {
            Ok(stdout) => parse_crontab(&stdout),
            Err(SourceError::ToolUnavailable { .. }) => {
                warn!("'crontab' command not found, skipping user crontab fetch");
                Vec::new()
            }
            Err(e) => {
                debug!(error = %e, "no user crontab");
                Vec::new()
            }
        }
    }

    async fn list(&self) -> Result<String, SourceError> {
        let output = self
            .runner
            .run(CRONTAB, &["-l"])
            .await?
            .require_success(CRONTAB)?;
        Ok(output.stdout)
    }
}

/// Keep trimmed, non-blank, non-comment lines of `crontab -l` output.
pub fn parse_crontab(output: &str) -> Vec<DeclaredJob> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(DeclaredJob::parse)
        .collect()
}
