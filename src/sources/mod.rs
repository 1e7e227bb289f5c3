//! Adapters for the system collaborators: the crontab, the service
//! manager, the journal and plain log files.
//!
//! Every external program goes through [`CommandRunner`] so the adapters
//! can be exercised with scripted outputs. All `Command` invocations use
//! hardcoded program names; only the unit name and window are variable.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;

pub mod logs;
pub mod schedule;

pub use logs::{tail_file, LogSource};
pub use schedule::{parse_crontab, ScheduleSource};

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code (`None` when killed by a signal).
    pub exit_code: Option<i32>,
    /// Captured stdout text, decoded lossily.
    pub stdout: String,
    /// Captured stderr text, decoded lossily.
    pub stderr: String,
}

impl CommandOutput {
    /// Returns `true` when the command exited with code 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into [`SourceError::NonZeroExit`].
    ///
    /// # Errors
    ///
    /// Returns an error when the command did not exit with code 0.
    pub fn require_success(self, program: &str) -> Result<Self, SourceError> {
        if self.success() {
            Ok(self)
        } else {
            Err(SourceError::NonZeroExit {
                program: program.to_owned(),
                code: self.exit_code,
            })
        }
    }
}

/// Errors produced by source adapters. Callers degrade these to empty
/// results; none of them aborts a run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The program is not installed or not on `PATH`.
    #[error("{program} is not available on this system")]
    ToolUnavailable {
        /// Program name.
        program: String,
    },
    /// The program ran but exited unsuccessfully.
    #[error("{program} exited with code {code:?}")]
    NonZeroExit {
        /// Program name.
        program: String,
        /// Exit code, if any.
        code: Option<i32>,
    },
    /// The program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The blocking task running the program panicked or was cancelled.
    #[error("{program} task did not complete: {reason}")]
    TaskFailed {
        /// Program name.
        program: String,
        /// Join error text.
        reason: String,
    },
    /// A log file could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    Unreadable {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Runs an external program to completion and captures its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`.
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, SourceError>;
}

/// [`CommandRunner`] backed by `std::process::Command` on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, SourceError> {
        let program_owned = program.to_owned();
        let args_owned: Vec<String> = args.iter().map(|a| (*a).to_owned()).collect();

        let result = tokio::task::spawn_blocking(move || {
            std::process::Command::new(&program_owned)
                .args(&args_owned)
                .stdin(Stdio::null())
                .output()
        })
        .await
        .map_err(|e| SourceError::TaskFailed {
            program: program.to_owned(),
            reason: e.to_string(),
        })?;

        let output = match result {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::ToolUnavailable {
                    program: program.to_owned(),
                });
            }
            Err(e) => {
                return Err(SourceError::Spawn {
                    program: program.to_owned(),
                    source: e,
                });
            }
        };

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
