//! Event extraction from raw scheduler log lines.
//!
//! Filtering is a pure per-line predicate supplied by the [`Flavor`]. Field
//! parsing is done by small tokenizers that return typed optional values;
//! a missing token is never an error, callers fall back to neutral defaults.

use std::sync::LazyLock;

use regex::Regex;

use crate::flavor::Flavor;

/// Label used when a line carries no `CMD (...)` token.
pub const UNKNOWN_JOB: &str = "Unknown job";

/// Literal marker preceding an exit status.
const EXIT_MARKER: &str = "EXIT STATUS";

/// Marker for a clean exit, as written by cron daemons.
const EXIT_OK_MARKER: &str = "EXIT STATUS (0)";

static CMD_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"CMD \((.*?)\)").ok());

static EXIT_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"EXIT STATUS \(([0-9]+)\)").ok());

/// One log line recognized as scheduler activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// The line as read from the log source.
    pub raw_line: String,
    /// Text enclosed by the first `CMD (...)` token.
    pub job_identifier: Option<String>,
    /// Integer from an `EXIT STATUS (n)` token.
    pub exit_code: Option<i32>,
    /// Whether the literal `EXIT STATUS` appears at all.
    pub has_exit_marker: bool,
}

impl LogEvent {
    /// Tokenize a single raw line into an event.
    pub fn parse(line: &str) -> Self {
        Self {
            raw_line: line.to_owned(),
            job_identifier: extract_job_identifier(line).map(str::to_owned),
            exit_code: extract_exit_code(line),
            has_exit_marker: has_exit_marker(line),
        }
    }

    /// Job identifier, or [`UNKNOWN_JOB`] when the line has none.
    pub fn job_label(&self) -> &str {
        self.job_identifier.as_deref().unwrap_or(UNKNOWN_JOB)
    }

    /// Cron failure rule: an exit marker is present and it is not `(0)`.
    ///
    /// Unlike [`LogEvent::exit_code`], a marker with an unparsable code
    /// still counts as a failure here.
    pub fn reports_failure(&self) -> bool {
        self.has_exit_marker && !self.raw_line.contains(EXIT_OK_MARKER)
    }
}

/// Keep the lines relevant to `flavor`, in input order, parsed as events.
pub fn extract_events<I, S>(lines: I, flavor: Flavor) -> Vec<LogEvent>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter(|line| flavor.is_relevant(line.as_ref()))
        .map(|line| LogEvent::parse(line.as_ref()))
        .collect()
}

/// Text inside the first `CMD (...)` token, up to the first closing paren.
pub fn extract_job_identifier(line: &str) -> Option<&str> {
    let captures = CMD_PATTERN.as_ref()?.captures(line)?;
    captures.get(1).map(|m| m.as_str())
}

/// Exit code from an `EXIT STATUS (n)` token.
///
/// Returns `None` when the token is absent. Digits too large for `i32`
/// saturate to `i32::MAX`, so an oversized status still reads as non-zero.
/// Leading zeros are ignored: `(00)` is a zero exit.
pub fn extract_exit_code(line: &str) -> Option<i32> {
    let captures = EXIT_PATTERN.as_ref()?.captures(line)?;
    let digits = captures.get(1)?.as_str();
    // Only ASCII digits reach here, so a parse error means overflow.
    Some(digits.parse::<i32>().unwrap_or(i32::MAX))
}

/// Whether the line mentions an exit status at all.
pub fn has_exit_marker(line: &str) -> bool {
    line.contains(EXIT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_identifier_stops_at_first_paren() {
        assert_eq!(
            extract_job_identifier("CRON[1]: (root) CMD (echo (hi))"),
            Some("echo (hi")
        );
    }

    #[test]
    fn job_identifier_absent() {
        assert_eq!(extract_job_identifier("CRON[1]: session opened"), None);
    }

    #[test]
    fn job_identifier_requires_space_before_paren() {
        assert_eq!(extract_job_identifier("CMD(/bin/true)"), None);
    }

    #[test]
    fn exit_code_parses_digits() {
        assert_eq!(extract_exit_code("fcron[9]: job EXIT STATUS (7)"), Some(7));
        assert_eq!(extract_exit_code("fcron[9]: job EXIT STATUS (0)"), Some(0));
    }

    #[test]
    fn exit_code_absent_or_malformed() {
        assert_eq!(extract_exit_code("fcron[9]: job started"), None);
        assert_eq!(extract_exit_code("EXIT STATUS (abc)"), None);
    }

    #[test]
    fn exit_code_overflow_saturates() {
        assert_eq!(
            extract_exit_code("EXIT STATUS (99999999999)"),
            Some(i32::MAX)
        );
    }

    #[test]
    fn exit_code_leading_zeros_are_numeric() {
        assert_eq!(extract_exit_code("EXIT STATUS (00)"), Some(0));
        assert_eq!(extract_exit_code("EXIT STATUS (007)"), Some(7));
    }

    #[test]
    fn malformed_marker_is_cron_failure() {
        let event = LogEvent::parse("CRON[2]: EXIT STATUS (abc)");
        assert!(event.has_exit_marker);
        assert_eq!(event.exit_code, None);
        assert!(event.reports_failure());
    }

    #[test]
    fn job_label_defaults_to_unknown() {
        let event = LogEvent::parse("fcron[3]: started");
        assert_eq!(event.job_label(), UNKNOWN_JOB);
    }
}
