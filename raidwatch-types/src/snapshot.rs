//! Snapshot - every reading fetched for one check run.

use std::collections::BTreeMap;

use crate::SCHEMA_VERSION;

/// Every reading fetched from a controller for one check run.
///
/// A snapshot is produced once by the query side and then decoded without
/// further I/O. With the `serde` feature it can be dumped to JSON and
/// replayed later.
///
/// # Example
///
/// ```rust
/// use raidwatch_types::Snapshot;
///
/// let snapshot = Snapshot::builder()
///     .timestamp_ms(1703160000000)
///     .device("Door", 9, 0b100_0010, 0, 0)
///     .drive_status(255)
///     .drive_identity(0, "ST3500630NS", "9QG3ABCD")
///     .build();
///
/// assert_eq!(snapshot.devices.statuses, vec![0b100_0010]);
/// assert!(snapshot.drives.identity(0).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// Format version, see [`SCHEMA_VERSION`].
    #[cfg_attr(feature = "serde", serde(default = "current_version"))]
    pub version: u32,

    /// Unix timestamp in milliseconds when the snapshot was taken.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp_ms: u64,

    #[cfg_attr(feature = "serde", serde(default))]
    pub system: SystemInfo,

    #[cfg_attr(feature = "serde", serde(default))]
    pub drives: DriveTable,

    #[cfg_attr(feature = "serde", serde(default))]
    pub devices: DeviceTable,
}

impl Snapshot {
    /// Create a builder for constructing snapshots.
    pub fn builder() -> SnapshotBuilder {
        SnapshotBuilder::new()
    }

    /// Whether this build can decode the snapshot.
    pub fn is_compatible(&self) -> bool {
        self.version == SCHEMA_VERSION
    }
}

#[cfg(feature = "serde")]
fn current_version() -> u32 {
    SCHEMA_VERSION
}

/// Identification of the controller itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SystemInfo {
    pub vendor: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_major: i64,
    pub firmware_minor: i64,
}

/// Model and serial number of one physical drive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveIdentity {
    pub model: String,
    pub serial_number: String,
}

/// Physical drive and logical volume state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriveTable {
    /// Member drive count per logical drive.
    pub logical_drive_counts: Vec<i64>,
    /// Spare drive count per logical drive.
    pub spare_drive_counts: Vec<i64>,
    /// Failed drive count per logical drive.
    pub failed_drive_counts: Vec<i64>,
    /// Enumerated status code per logical drive.
    pub logical_drive_status: Vec<i64>,
    /// Enumerated status code per physical drive.
    pub drive_status: Vec<i64>,
    /// Identities fetched for failed or absent drives, keyed by drive index.
    pub identities: BTreeMap<usize, DriveIdentity>,
}

impl DriveTable {
    /// Identity of the drive at `index`, if it was fetched.
    pub fn identity(&self, index: usize) -> Option<&DriveIdentity> {
        self.identities.get(&index)
    }
}

/// The controller's device table as five parallel columns.
///
/// Columns are kept exactly as fetched; whether they line up is checked by
/// the decoder, not here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceTable {
    pub descriptions: Vec<String>,
    pub type_codes: Vec<i64>,
    pub statuses: Vec<i64>,
    pub values: Vec<i64>,
    pub units: Vec<i64>,
}

impl DeviceTable {
    /// Number of rows, taken from the type column.
    pub fn len(&self) -> usize {
        self.type_codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.type_codes.is_empty()
    }

    /// True when all five columns have the same length.
    pub fn is_aligned(&self) -> bool {
        let n = self.type_codes.len();
        self.descriptions.len() == n
            && self.statuses.len() == n
            && self.values.len() == n
            && self.units.len() == n
    }

    /// Append one row to every column.
    pub fn push(&mut self, description: impl Into<String>, type_code: i64, status: i64, value: i64, unit: i64) {
        self.descriptions.push(description.into());
        self.type_codes.push(type_code);
        self.statuses.push(status);
        self.values.push(value);
        self.units.push(unit);
    }
}

/// Builder for constructing `Snapshot` instances.
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    timestamp_ms: Option<u64>,
    system: SystemInfo,
    drives: DriveTable,
    devices: DeviceTable,
}

impl SnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    pub fn vendor(mut self, vendor: impl Into<String>) -> Self {
        self.system.vendor = vendor.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.system.model = model.into();
        self
    }

    pub fn serial_number(mut self, serial: impl Into<String>) -> Self {
        self.system.serial_number = serial.into();
        self
    }

    pub fn firmware(mut self, major: i64, minor: i64) -> Self {
        self.system.firmware_major = major;
        self.system.firmware_minor = minor;
        self
    }

    /// Add a logical drive with its member, spare and failed drive counts.
    pub fn logical_drive(mut self, status: i64, members: i64, spares: i64, failed: i64) -> Self {
        self.drives.logical_drive_status.push(status);
        self.drives.logical_drive_counts.push(members);
        self.drives.spare_drive_counts.push(spares);
        self.drives.failed_drive_counts.push(failed);
        self
    }

    /// Add a physical drive status.
    pub fn drive_status(mut self, status: i64) -> Self {
        self.drives.drive_status.push(status);
        self
    }

    /// Record the identity of the drive at `index`.
    pub fn drive_identity(mut self, index: usize, model: impl Into<String>, serial: impl Into<String>) -> Self {
        self.drives.identities.insert(
            index,
            DriveIdentity {
                model: model.into(),
                serial_number: serial.into(),
            },
        );
        self
    }

    /// Add one device table row.
    pub fn device(mut self, description: impl Into<String>, type_code: i64, status: i64, value: i64, unit: i64) -> Self {
        self.devices.push(description, type_code, status, value, unit);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> Snapshot {
        Snapshot {
            version: SCHEMA_VERSION,
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            system: self.system,
            drives: self.drives,
            devices: self.devices,
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_builder() {
        let snapshot = Snapshot::builder()
            .timestamp_ms(1703160000000)
            .vendor("Sun")
            .firmware(3, 27)
            .logical_drive(0, 6, 1, 0)
            .drive_status(1)
            .drive_status(255)
            .device("PSU 0", 1, 0, 0, 0)
            .build();

        assert_eq!(snapshot.timestamp_ms, 1703160000000);
        assert_eq!(snapshot.system.firmware_minor, 27);
        assert_eq!(snapshot.drives.logical_drive_counts, vec![6]);
        assert_eq!(snapshot.drives.drive_status, vec![1, 255]);
        assert_eq!(snapshot.devices.len(), 1);
        assert!(snapshot.devices.is_aligned());
        assert!(snapshot.is_compatible());
    }

    #[test]
    fn test_misaligned_columns() {
        let mut devices = DeviceTable::default();
        devices.push("Fan", 2, 0, 0, 0);
        devices.units.pop();
        assert!(!devices.is_aligned());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let snapshot = Snapshot::builder()
            .timestamp_ms(1703160000000)
            .drive_status(255)
            .drive_identity(0, "HUS72302", "YGK1234")
            .device("Temp 1", 3, 0, 547603968, 1000)
            .build();

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(snapshot, parsed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: Snapshot = serde_json::from_str(r#"{ "devices": { "type_codes": [2] } }"#).unwrap();
        assert_eq!(parsed.version, SCHEMA_VERSION);
        assert_eq!(parsed.devices.type_codes, vec![2]);
        assert!(!parsed.devices.is_aligned());
    }
}
