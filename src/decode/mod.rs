//! Device health decoding.
//!
//! This module turns one already-fetched [`Snapshot`] into a [`Report`]:
//! an ordered list of findings, performance samples and a single verdict.
//! It performs no I/O.
//!
//! ## Submodules
//!
//! - [`bits`]: status word bit and numeral access
//! - [`units`]: fan speed and temperature conversion, sample thresholds
//! - [`device`]: per-category device classifiers and type code dispatch
//! - [`drive`]: physical drive and logical volume status tables
//! - [`blacklist`]: categories excluded by the operator
//! - [`report`]: severity counters and the verdict
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot
//!    │
//!    ├──▶ system info ──▶ informational findings
//!    ├──▶ drive table ──▶ drive / logical drive findings
//!    └──▶ device table ──▶ readings() ──▶ DeviceCategory::classify()
//!                                            │
//!                                            ▼
//!                                 Report (counters, findings, samples)
//! ```

pub mod bits;
pub mod blacklist;
pub mod device;
pub mod drive;
pub mod report;
pub mod units;

pub use bits::StatusBits;
pub use blacklist::{Blacklist, UnknownTag, ABSENT_DRIVES};
pub use device::{DeviceCategory, DeviceOutcome};
pub use report::{Report, SeverityCounters};
pub use units::Thresholds;

use raidwatch_types::{DeviceTable, DriveTable, Finding, SensorReading, Snapshot, SystemInfo};
use tracing::{debug, warn};

use crate::error::DecodeError;

/// Assemble device table rows from the five parallel columns.
///
/// Fails when the columns differ in length or a status word is negative.
pub fn readings(devices: &DeviceTable) -> Result<Vec<SensorReading>, DecodeError> {
    if !devices.is_aligned() {
        return Err(DecodeError::ColumnMismatch {
            descriptions: devices.descriptions.len(),
            types: devices.type_codes.len(),
            statuses: devices.statuses.len(),
            values: devices.values.len(),
            units: devices.units.len(),
        });
    }

    (0..devices.len())
        .map(|i| {
            let status = devices.statuses[i];
            let status = u64::try_from(status).map_err(|_| DecodeError::NegativeStatus { index: i, status })?;
            Ok(SensorReading::new(
                devices.descriptions[i].as_str(),
                devices.type_codes[i],
                status,
                devices.values[i],
                devices.units[i],
            ))
        })
        .collect()
}

/// Decode device readings with default thresholds.
pub fn run(readings: &[SensorReading], blacklist: &Blacklist) -> Report {
    let decoder = Decoder::new(blacklist.clone(), Thresholds::default());
    let mut report = Report::new();
    decoder.check_devices(readings, &mut report);
    report
}

/// Decodes snapshots with a fixed blacklist and thresholds.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    blacklist: Blacklist,
    thresholds: Thresholds,
}

impl Decoder {
    pub fn new(blacklist: Blacklist, thresholds: Thresholds) -> Self {
        Self { blacklist, thresholds }
    }

    /// Decode a whole snapshot into a fresh report.
    ///
    /// The device table is validated before anything is decoded, so a
    /// malformed table yields an error and no partial report.
    pub fn run(&self, snapshot: &Snapshot) -> Result<Report, DecodeError> {
        let readings = readings(&snapshot.devices)?;

        let mut report = Report::new();
        self.check_system(&snapshot.system, &mut report);
        self.check_drives(&snapshot.drives, &mut report);
        self.check_devices(&readings, &mut report);

        debug!(
            findings = report.findings().len(),
            samples = report.samples().len(),
            verdict = %report.verdict(),
            "decoded snapshot"
        );
        Ok(report)
    }

    /// Controller identification and drive counts, all informational.
    pub fn check_system(&self, system: &SystemInfo, report: &mut Report) {
        report.record(Finding::info("Vendor", system.vendor.as_str()));
        report.record(Finding::info("Model", system.model.as_str()));
        report.record(Finding::info("Serial Number", system.serial_number.as_str()));
        report.record(Finding::info(
            "Firmware Version",
            format!("{}.{}", system.firmware_major, system.firmware_minor),
        ));
    }

    /// Drive counts, logical drive status, then physical drive status.
    pub fn check_drives(&self, drives: &DriveTable, report: &mut Report) {
        report.record(Finding::info("Logical Drives", join_counts(&drives.logical_drive_counts)));
        report.record(Finding::info("Spare Drives", join_counts(&drives.spare_drive_counts)));
        report.record(Finding::info("Failed Drives", join_counts(&drives.failed_drive_counts)));

        for (index, &status) in drives.logical_drive_status.iter().enumerate() {
            debug!(logical_drive = index, status, "checking logical drive");
            if let Some(finding) = drive::classify_logical_drive(index, status) {
                report.record(finding);
            }
        }

        for (index, &status) in drives.drive_status.iter().enumerate() {
            debug!(drive = index, status, "checking drive");
            report.record_all(drive::classify_drive(index, status, drives, &self.blacklist));
        }
    }

    /// Classify every reading in enumeration order.
    ///
    /// A reading that cannot be interpreted is recorded as an unknown
    /// finding and does not stop the remaining readings.
    pub fn check_devices(&self, readings: &[SensorReading], report: &mut Report) {
        for reading in readings {
            let category = match DeviceCategory::from_type_code(reading.type_code) {
                Ok(category) => category,
                Err(e) => {
                    warn!(device = %reading.description, error = %e, "cannot dispatch device");
                    report.record(Finding::unknown(reading.description.as_str(), e.to_string()));
                    continue;
                }
            };

            if self.blacklist.contains(category) {
                debug!(device = %reading.description, category = category.tag(), "blacklisted, skipping");
                continue;
            }

            match category.classify(reading, &self.thresholds) {
                Ok(outcome) => {
                    for finding in &outcome.findings {
                        debug!(
                            device = %reading.description,
                            severity = finding.severity.symbol(),
                            message = %finding.message,
                            "device finding"
                        );
                    }
                    report.record_all(outcome.findings);
                    if let Some(sample) = outcome.sample {
                        report.add_sample(sample);
                    }
                }
                Err(e) => {
                    warn!(device = %reading.description, error = %e, "cannot decode device");
                    report.record(Finding::unknown(reading.description.as_str(), e.to_string()));
                }
            }
        }
    }
}

fn join_counts(counts: &[i64]) -> String {
    counts.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",")
}
