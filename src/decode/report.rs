//! Aggregation of findings and samples into one verdict.

use raidwatch_types::{Finding, PerformanceSample, Severity, Verdict};

/// Running tally of counted severities for one check run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounters {
    pub critical: u32,
    pub warning: u32,
    pub unknown: u32,
}

impl SeverityCounters {
    /// Count one finding of `severity`. Informational findings are not counted.
    pub fn count(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Warning => self.warning += 1,
            Severity::Unknown => self.unknown += 1,
            Severity::Info => {}
        }
    }

    /// Critical beats Warning beats Unknown beats OK.
    pub fn verdict(&self) -> Verdict {
        if self.critical > 0 {
            Verdict::Critical
        } else if self.warning > 0 {
            Verdict::Warning
        } else if self.unknown > 0 {
            Verdict::Unknown
        } else {
            Verdict::Ok
        }
    }
}

/// Everything one check run found, in the order it was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    counters: SeverityCounters,
    findings: Vec<Finding>,
    samples: Vec<PerformanceSample>,
}

impl Report {
    /// An empty report with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finding and count its severity.
    pub fn record(&mut self, finding: Finding) {
        self.counters.count(finding.severity);
        self.findings.push(finding);
    }

    pub fn record_all(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for finding in findings {
            self.record(finding);
        }
    }

    pub fn add_sample(&mut self, sample: PerformanceSample) {
        self.samples.push(sample);
    }

    pub fn verdict(&self) -> Verdict {
        self.counters.verdict()
    }

    pub fn counters(&self) -> SeverityCounters {
        self.counters
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn samples(&self) -> &[PerformanceSample] {
        &self.samples
    }

    /// Consume the report into its verdict, findings and samples.
    pub fn into_parts(self) -> (Verdict, Vec<Finding>, Vec<PerformanceSample>) {
        (self.counters.verdict(), self.findings, self.samples)
    }
}
