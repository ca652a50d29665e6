//! Gathers a snapshot through any [`QueryService`].

use raidwatch_types::{
    current_timestamp_ms, DeviceTable, DriveIdentity, DriveTable, QueryValue, Snapshot, SystemInfo, SCHEMA_VERSION,
};
use tracing::{debug, info, warn};

use super::snmp::is_notice;
use super::QueryService;
use crate::decode::{drive, Blacklist};
use crate::error::SourceError;

/// Known base addresses, probed in order.
pub const BASE_ADDRESSES: [&str; 3] = [
    "1.3.6.1.4.1.1714.",
    "1.3.6.1.4.1.42.2.180.3510.1.",
    "1.3.6.1.4.1.42.2.180.3511.1.",
];

/// Probe suffix answered by every supported array.
const PROBE: &str = "1.1.1.10.0";

const VENDOR: &str = "1.1.1.14.0";
const MODEL: &str = "1.1.1.13.0";
const SERIAL_NUMBER: &str = "1.1.1.10.0";
const FIRMWARE_MAJOR: &str = "1.1.1.4.0";
const FIRMWARE_MINOR: &str = "1.1.1.5.0";

const LOGICAL_DRIVE_COUNTS: &str = "1.2.1.8";
const SPARE_DRIVE_COUNTS: &str = "1.2.1.10";
const FAILED_DRIVE_COUNTS: &str = "1.2.1.11";
const LOGICAL_DRIVE_STATUS: &str = "1.2.1.6";
const DRIVE_STATUS: &str = "1.6.1.11";
const DRIVE_MODEL: &str = "1.6.1.15";
const DRIVE_SERIAL_NUMBER: &str = "1.6.1.17";

const DEVICE_DESCRIPTION: &str = "1.9.1.8";
const DEVICE_TYPE: &str = "1.9.1.6";
const DEVICE_VALUE: &str = "1.9.1.9";
const DEVICE_UNIT: &str = "1.9.1.10";
const DEVICE_STATUS: &str = "1.9.1.13";

/// Find the base address the agent answers under.
pub fn discover_base<Q: QueryService + ?Sized>(service: &Q, host: &str) -> Result<&'static str, SourceError> {
    for base in BASE_ADDRESSES {
        let oid = format!("{}{}", base, PROBE);
        match service.get(&oid) {
            Ok(result) => {
                let answered = result
                    .into_scalar()
                    .is_some_and(|value| !value.as_str().is_some_and(is_notice));
                if answered {
                    return Ok(base);
                }
                debug!(base, "no such object");
            }
            Err(e @ SourceError::MissingTool(_)) => return Err(e),
            Err(e) => debug!(base, error = %e, "probe failed"),
        }
    }
    Err(SourceError::NoBaseAddress(host.to_string()))
}

/// Reads every table a check run needs under one base address.
#[derive(Debug)]
pub struct Collector<'a, Q: QueryService + ?Sized> {
    service: &'a Q,
    base: &'a str,
    blacklist: &'a Blacklist,
}

impl<'a, Q: QueryService + ?Sized> Collector<'a, Q> {
    pub fn new(service: &'a Q, base: &'a str, blacklist: &'a Blacklist) -> Self {
        Self {
            service,
            base,
            blacklist,
        }
    }

    /// Fetch system info, drive tables and the device table.
    pub fn collect(&self) -> Result<Snapshot, SourceError> {
        let system = self.system()?;
        let drives = self.drives()?;
        let devices = self.devices()?;

        info!(
            logical_drives = drives.logical_drive_status.len(),
            drives = drives.drive_status.len(),
            devices = devices.len(),
            "collected snapshot"
        );

        Ok(Snapshot {
            version: SCHEMA_VERSION,
            timestamp_ms: current_timestamp_ms(),
            system,
            drives,
            devices,
        })
    }

    fn system(&self) -> Result<SystemInfo, SourceError> {
        Ok(SystemInfo {
            vendor: self.get_string(VENDOR)?,
            model: self.get_string(MODEL)?,
            serial_number: self.get_string(SERIAL_NUMBER)?,
            firmware_major: self.get_integer(FIRMWARE_MAJOR)?,
            firmware_minor: self.get_integer(FIRMWARE_MINOR)?,
        })
    }

    fn drives(&self) -> Result<DriveTable, SourceError> {
        let mut drives = DriveTable {
            logical_drive_counts: self.walk_integers(LOGICAL_DRIVE_COUNTS)?,
            spare_drive_counts: self.walk_integers(SPARE_DRIVE_COUNTS)?,
            failed_drive_counts: self.walk_integers(FAILED_DRIVE_COUNTS)?,
            logical_drive_status: self.walk_integers(LOGICAL_DRIVE_STATUS)?,
            drive_status: self.walk_integers(DRIVE_STATUS)?,
            ..DriveTable::default()
        };

        for (index, &status) in drives.drive_status.iter().enumerate() {
            if !drive::wants_identity(status, self.blacklist) {
                continue;
            }
            match self.identity(index) {
                Ok(identity) => {
                    drives.identities.insert(index, identity);
                }
                Err(e) => warn!(drive = index, error = %e, "cannot fetch drive identity"),
            }
        }
        Ok(drives)
    }

    fn identity(&self, index: usize) -> Result<DriveIdentity, SourceError> {
        Ok(DriveIdentity {
            model: self.get_string(&format!("{}.{}", DRIVE_MODEL, index))?,
            serial_number: self.get_string(&format!("{}.{}", DRIVE_SERIAL_NUMBER, index))?,
        })
    }

    fn devices(&self) -> Result<DeviceTable, SourceError> {
        Ok(DeviceTable {
            descriptions: self.walk_strings(DEVICE_DESCRIPTION)?,
            type_codes: self.walk_integers(DEVICE_TYPE)?,
            values: self.walk_integers(DEVICE_VALUE)?,
            units: self.walk_integers(DEVICE_UNIT)?,
            statuses: self.walk_integers(DEVICE_STATUS)?,
        })
    }

    fn oid(&self, suffix: &str) -> String {
        format!("{}{}", self.base, suffix)
    }

    fn get_value(&self, suffix: &str) -> Result<(String, QueryValue), SourceError> {
        let oid = self.oid(suffix);
        let value = self.service.get(&oid)?.into_scalar().ok_or_else(|| SourceError::Query {
            oid: oid.clone(),
            message: "empty response".to_string(),
        })?;
        Ok((oid, value))
    }

    fn get_string(&self, suffix: &str) -> Result<String, SourceError> {
        let (_, value) = self.get_value(suffix)?;
        Ok(value.to_string())
    }

    fn get_integer(&self, suffix: &str) -> Result<i64, SourceError> {
        let (oid, value) = self.get_value(suffix)?;
        integer(&oid, value)
    }

    fn walk_strings(&self, suffix: &str) -> Result<Vec<String>, SourceError> {
        let oid = self.oid(suffix);
        let values = self.service.walk(&oid)?.into_list();
        Ok(values.iter().map(QueryValue::to_string).collect())
    }

    fn walk_integers(&self, suffix: &str) -> Result<Vec<i64>, SourceError> {
        let oid = self.oid(suffix);
        self.service
            .walk(&oid)?
            .into_list()
            .into_iter()
            .map(|value| integer(&oid, value))
            .collect()
    }
}

fn integer(oid: &str, value: QueryValue) -> Result<i64, SourceError> {
    value.as_integer().ok_or_else(|| SourceError::UnexpectedValue {
        oid: oid.to_string(),
        expected: "integer",
        got: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use raidwatch_types::QueryResult;

    use super::*;

    const BASE: &str = "1.3.6.1.4.1.1714.";

    /// In-memory agent keyed by full OID.
    #[derive(Debug, Default)]
    struct FakeAgent {
        values: HashMap<String, QueryResult>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeAgent {
        fn scalar(mut self, suffix: &str, value: impl Into<QueryValue>) -> Self {
            self.values
                .insert(format!("{}{}", BASE, suffix), QueryResult::Scalar(value.into()));
            self
        }

        fn column(mut self, suffix: &str, values: Vec<QueryValue>) -> Self {
            self.values.insert(format!("{}{}", BASE, suffix), QueryResult::List(values));
            self
        }

        fn answer(&self, oid: &str) -> Result<QueryResult, SourceError> {
            self.calls.borrow_mut().push(oid.to_string());
            self.values.get(oid).cloned().ok_or_else(|| SourceError::Query {
                oid: oid.to_string(),
                message: "Timeout: No Response".to_string(),
            })
        }

        fn called(&self, suffix: &str) -> bool {
            self.calls.borrow().iter().any(|oid| oid == &format!("{}{}", BASE, suffix))
        }
    }

    impl QueryService for FakeAgent {
        fn get(&self, oid: &str) -> Result<QueryResult, SourceError> {
            self.answer(oid)
        }

        fn walk(&self, oid: &str) -> Result<QueryResult, SourceError> {
            self.answer(oid)
        }
    }

    fn ints(values: &[i64]) -> Vec<QueryValue> {
        values.iter().copied().map(QueryValue::Integer).collect()
    }

    fn array(drive_status: &[i64]) -> FakeAgent {
        FakeAgent::default()
            .scalar(VENDOR, "Infortrend")
            .scalar(MODEL, "EonStor")
            .scalar(SERIAL_NUMBER, 8012345_i64)
            .scalar(FIRMWARE_MAJOR, 3_i64)
            .scalar(FIRMWARE_MINOR, 48_i64)
            .column(LOGICAL_DRIVE_COUNTS, ints(&[4]))
            .column(SPARE_DRIVE_COUNTS, ints(&[1]))
            .column(FAILED_DRIVE_COUNTS, ints(&[0]))
            .column(LOGICAL_DRIVE_STATUS, ints(&[0]))
            .column(DRIVE_STATUS, ints(drive_status))
            .column(DEVICE_DESCRIPTION, vec!["Fan 0".into(), "Door".into()])
            .column(DEVICE_TYPE, ints(&[2, 9]))
            .column(DEVICE_VALUE, ints(&[12292, 0]))
            .column(DEVICE_UNIT, ints(&[-1, 0]))
            .column(DEVICE_STATUS, ints(&[0, 0b100_0010]))
    }

    #[test]
    fn test_collect_snapshot() {
        let agent = array(&[1, 1]);
        let snapshot = Collector::new(&agent, BASE, &Blacklist::new()).collect().unwrap();

        assert_eq!(snapshot.version, SCHEMA_VERSION);
        assert_eq!(snapshot.system.vendor, "Infortrend");
        assert_eq!(snapshot.system.serial_number, "8012345");
        assert_eq!((snapshot.system.firmware_major, snapshot.system.firmware_minor), (3, 48));
        assert_eq!(snapshot.drives.drive_status, vec![1, 1]);
        assert_eq!(snapshot.devices.descriptions, vec!["Fan 0", "Door"]);
        assert_eq!(snapshot.devices.statuses, vec![0, 0b100_0010]);
        assert!(snapshot.devices.is_aligned());
        assert!(snapshot.drives.identities.is_empty());
    }

    #[test]
    fn test_identity_fetched_for_failed_drive() {
        let agent = array(&[1, 255])
            .scalar("1.6.1.15.1", "ST3500630NS")
            .scalar("1.6.1.17.1", "9QG3ABCD");
        let snapshot = Collector::new(&agent, BASE, &Blacklist::new()).collect().unwrap();

        let identity = snapshot.drives.identity(1).unwrap();
        assert_eq!(identity.model, "ST3500630NS");
        assert_eq!(identity.serial_number, "9QG3ABCD");
        assert!(!agent.called("1.6.1.15.0"));
    }

    #[test]
    fn test_absent_drive_identity_honours_blacklist() {
        let agent = array(&[63]).scalar("1.6.1.15.0", "m").scalar("1.6.1.17.0", "s");

        Collector::new(&agent, BASE, &Blacklist::new().with_absent_drives())
            .collect()
            .unwrap();
        assert!(!agent.called("1.6.1.15.0"));

        Collector::new(&agent, BASE, &Blacklist::new()).collect().unwrap();
        assert!(agent.called("1.6.1.15.0"));
    }

    #[test]
    fn test_identity_failure_is_not_fatal() {
        let agent = array(&[255]);
        let snapshot = Collector::new(&agent, BASE, &Blacklist::new()).collect().unwrap();
        assert!(snapshot.drives.identity(0).is_none());
    }

    #[test]
    fn test_string_where_integer_expected() {
        let agent = array(&[1]).column(DEVICE_TYPE, vec!["fan".into(), QueryValue::Integer(9)]);
        let err = Collector::new(&agent, BASE, &Blacklist::new()).collect().unwrap_err();
        assert!(matches!(err, SourceError::UnexpectedValue { expected: "integer", ref got, .. } if got == "fan"));
    }

    #[test]
    fn test_discover_first_answering_base() {
        let agent = FakeAgent::default().scalar(PROBE, 8012345_i64);
        assert_eq!(discover_base(&agent, "array1").unwrap(), BASE);
    }

    #[test]
    fn test_discover_skips_no_such_object() {
        let mut agent = FakeAgent::default();
        agent.values.insert(
            format!("{}{}", BASE_ADDRESSES[0], PROBE),
            QueryResult::Scalar("No Such Object available on this agent at this OID".into()),
        );
        agent.values.insert(
            format!("{}{}", BASE_ADDRESSES[2], PROBE),
            QueryResult::Scalar(QueryValue::Integer(1)),
        );
        assert_eq!(discover_base(&agent, "array1").unwrap(), BASE_ADDRESSES[2]);
    }

    #[test]
    fn test_discover_none_answering() {
        let err = discover_base(&FakeAgent::default(), "array1").unwrap_err();
        assert!(matches!(err, SourceError::NoBaseAddress(ref host) if host == "array1"));
        assert_eq!(err.to_string(), "unable to auto detect array type at host array1");
    }
}
