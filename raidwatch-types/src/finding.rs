//! Findings, performance samples and the overall verdict.

use std::fmt;

/// Severity attached to a [`Finding`].
///
/// Variants are declared in verdict precedence order, so the derived
/// ordering ranks `Critical` highest and `Info` lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Reported to the operator, never counted.
    Info,
    /// The decoder could not interpret a reading.
    Unknown,
    Warning,
    Critical,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Unknown => "UNKNOWN",
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

/// One human-readable diagnostic statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Finding {
    /// What the finding is about, usually a device description.
    pub subject: String,
    pub message: String,
    pub severity: Severity,
}

impl Finding {
    /// Create a finding.
    pub fn new(subject: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            severity,
        }
    }

    pub fn info(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(subject, message, Severity::Info)
    }

    pub fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(subject, message, Severity::Warning)
    }

    pub fn critical(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(subject, message, Severity::Critical)
    }

    pub fn unknown(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(subject, message, Severity::Unknown)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// A numeric sample with the thresholds it is graphed against.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PerformanceSample {
    pub label: String,
    pub value: i64,
    pub warn: i64,
    pub crit: i64,
    pub min: i64,
    pub max: i64,
}

/// Worst-case summary of a whole check run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Verdict {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Verdict {
    /// Monitoring plugin exit code: OK=0, Warning=1, Critical=2, Unknown=3.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Ok => 0,
            Verdict::Warning => 1,
            Verdict::Critical => 2,
            Verdict::Unknown => 3,
        }
    }

    /// Upper-case label used at the start of the status line.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Warning => "WARNING",
            Verdict::Critical => "CRITICAL",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Verdict::Ok.exit_code(), 0);
        assert_eq!(Verdict::Warning.exit_code(), 1);
        assert_eq!(Verdict::Critical.exit_code(), 2);
        assert_eq!(Verdict::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_severity_order_follows_precedence() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Unknown);
        assert!(Severity::Unknown > Severity::Info);
    }

    #[test]
    fn test_severity_symbols() {
        assert_eq!(Severity::Info.symbol(), "INFO");
        assert_eq!(Severity::Unknown.symbol(), "UNKNOWN");
        assert_eq!(Severity::Warning.symbol(), "WARN");
        assert_eq!(Severity::Critical.symbol(), "CRIT");
    }

    #[test]
    fn test_finding_display() {
        let finding = Finding::warning("Door 1", "Door is open");
        assert_eq!(finding.to_string(), "Door 1: Door is open");
    }
}
