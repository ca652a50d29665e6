//! Monitoring plugin output.
//!
//! One status line on stdout:
//!
//! ```text
//! WARNING: Door: Door is open, Door lock not engaged; Fan 0: Fan is off | 'Fan 0'=4000;5713;5800;0;6000
//! ```

use std::fmt::Write;

use raidwatch_types::{Finding, PerformanceSample, Verdict};

use crate::decode::Report;

/// The full status line for a report.
pub fn status_line(report: &Report) -> String {
    let mut line = report.verdict().label().to_string();

    let findings = findings(report.findings());
    if !findings.is_empty() {
        line.push_str(": ");
        line.push_str(&findings);
    }

    let perfdata = perfdata(report.samples());
    if !perfdata.is_empty() {
        line.push_str(" | ");
        line.push_str(&perfdata);
    }
    line
}

/// Status line for a run that could not produce a report.
pub fn failure_line(verdict: Verdict, message: &str) -> String {
    format!("{}: {}", verdict.label(), message)
}

/// Findings grouped by consecutive subject.
pub fn findings(findings: &[Finding]) -> String {
    let mut out = String::new();
    let mut current: Option<&str> = None;

    for finding in findings {
        if current == Some(finding.subject.as_str()) {
            out.push_str(", ");
        } else {
            if current.is_some() {
                out.push_str("; ");
            }
            out.push_str(&finding.subject);
            out.push_str(": ");
            current = Some(finding.subject.as_str());
        }
        out.push_str(&finding.message);
    }
    out
}

/// Samples as `'label'=value;warn;crit;min;max`, space separated.
pub fn perfdata(samples: &[PerformanceSample]) -> String {
    let mut out = String::new();
    for (i, s) in samples.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        // writing to a String cannot fail
        let _ = write!(out, "'{}'={};{};{};{};{}", s.label, s.value, s.warn, s.crit, s.min, s.max);
    }
    out
}
