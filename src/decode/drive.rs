//! Physical drive and logical volume classifiers.
//!
//! Unlike device status words these are plain enumerations: each code maps
//! to one message and severity, and every code not listed is nominal
//! (online, used, spare, global spare, valid clone, SCSI device, ...).

use raidwatch_types::Severity::{Critical, Warning};
use raidwatch_types::{DriveTable, Finding, Severity};
use tracing::debug;

use super::blacklist::Blacklist;

/// Drive status reported for an absent drive.
pub const DRIVE_ABSENT: i64 = 63;

/// Drive status reported for a failed drive.
pub const DRIVE_FAILED: i64 = 255;

const DRIVE_CODES: &[(i64, Severity, &str)] = &[
    (0, Warning, "New (Unassigned) Drive"),
    (4, Warning, "Drive Initialization in Progress"),
    (5, Warning, "Drive Rebuild in Progress"),
    (6, Warning, "Add Drive to Logical Drive in Progress"),
    (17, Warning, "Drive is in process of Cloning another Drive"),
    (19, Warning, "Drive is in process of Copying from another Drive"),
    (DRIVE_ABSENT, Critical, "Drive Absent"),
    (252, Critical, "Missing Global Spare Drive"),
    (253, Critical, "Missing Spare Drive"),
    (254, Critical, "Missing Drive"),
    (DRIVE_FAILED, Critical, "Failed Drive"),
];

const LOGICAL_DRIVE_CODES: &[(i64, Severity, &str)] = &[
    (1, Warning, "Rebuilding"),
    (2, Warning, "Initializing"),
    (3, Warning, "Degraded"),
    (4, Critical, "Dead"),
    (5, Critical, "Invalid"),
    (6, Critical, "Incomplete"),
    (7, Critical, "Drive Missing"),
    (128, Critical, "Logical Drive Off-line"),
];

fn lookup(table: &[(i64, Severity, &'static str)], code: i64) -> Option<(Severity, &'static str)> {
    table
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(_, severity, message)| (severity, message))
}

/// Severity and message for a physical drive status code.
pub fn drive_status(code: i64) -> Option<(Severity, &'static str)> {
    lookup(DRIVE_CODES, code)
}

/// Severity and message for a logical drive status code.
pub fn logical_drive_status(code: i64) -> Option<(Severity, &'static str)> {
    lookup(LOGICAL_DRIVE_CODES, code)
}

/// Whether a drive with this status should have its model and serial
/// number looked up for the operator.
pub fn wants_identity(status: i64, blacklist: &Blacklist) -> bool {
    status == DRIVE_FAILED || (status == DRIVE_ABSENT && !blacklist.skips_absent_drives())
}

/// Findings for the physical drive at zero-based `index`.
///
/// Failed and absent drives are followed by their model and serial number
/// when the collector managed to fetch them.
pub fn classify_drive(index: usize, status: i64, drives: &DriveTable, blacklist: &Blacklist) -> Vec<Finding> {
    let subject = format!("Drive {}", index + 1);

    if status == DRIVE_ABSENT && blacklist.skips_absent_drives() {
        debug!(drive = index, "absent drive blacklisted");
        return Vec::new();
    }

    let Some((severity, message)) = drive_status(status) else {
        return Vec::new();
    };

    let mut findings = vec![Finding::new(subject.as_str(), message, severity)];
    if wants_identity(status, blacklist) {
        match drives.identity(index) {
            Some(identity) => {
                findings.push(Finding::info(subject.as_str(), format!("model: {}", identity.model)));
                findings.push(Finding::info(
                    subject.as_str(),
                    format!("serial number: {}", identity.serial_number),
                ));
            }
            None => {
                debug!(drive = index, "no identity fetched for drive");
                findings.push(Finding::info(subject.as_str(), "model and serial number unavailable"));
            }
        }
    }
    findings
}

/// Finding for the logical drive at zero-based `index`, if it is not nominal.
pub fn classify_logical_drive(index: usize, status: i64) -> Option<Finding> {
    logical_drive_status(status)
        .map(|(severity, message)| Finding::new(format!("Logical Drive {}", index + 1), message, severity))
}
