//! Device classifiers.
//!
//! Each device category reads its status word through a fixed list of
//! checks. A check either tests one bit or reads a multi-bit numeral, and
//! checks run in the order listed so findings come out in a stable order.

use raidwatch_types::Severity::{Critical, Info, Warning};
use raidwatch_types::{Finding, PerformanceSample, SensorReading, Severity};
use tracing::debug;

use super::bits::StatusBits;
use super::units::{self, Thresholds};
use crate::error::DecodeError;

/// Hardware categories found in the controller's device table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DeviceCategory {
    PowerSupply,
    Fan,
    Temperature,
    Ups,
    Voltage,
    Current,
    Door,
    Speaker,
    Battery,
    Slot,
    Led,
    /// Cache-data-backup flash device.
    Flash,
    EnclosureServices,
    HostBoard,
    Midplane,
    Drawer,
    /// Types the vendor does not document; never checked.
    Undocumented,
}

impl DeviceCategory {
    /// Every category, in blacklist tag listing order.
    pub const ALL: [DeviceCategory; 17] = [
        DeviceCategory::PowerSupply,
        DeviceCategory::Fan,
        DeviceCategory::Temperature,
        DeviceCategory::Ups,
        DeviceCategory::Voltage,
        DeviceCategory::Current,
        DeviceCategory::Door,
        DeviceCategory::Speaker,
        DeviceCategory::Battery,
        DeviceCategory::Slot,
        DeviceCategory::Led,
        DeviceCategory::Flash,
        DeviceCategory::EnclosureServices,
        DeviceCategory::HostBoard,
        DeviceCategory::Midplane,
        DeviceCategory::Drawer,
        DeviceCategory::Undocumented,
    ];

    /// Category for a vendor device type code.
    pub fn from_type_code(code: i64) -> Result<Self, DecodeError> {
        let category = match code {
            1 => DeviceCategory::PowerSupply,
            2 => DeviceCategory::Fan,
            3 | 8 => DeviceCategory::Temperature,
            4 => DeviceCategory::Ups,
            5 => DeviceCategory::Voltage,
            6 => DeviceCategory::Current,
            9 => DeviceCategory::Door,
            10 => DeviceCategory::Speaker,
            11 => DeviceCategory::Battery,
            12 => DeviceCategory::Led,
            13 => DeviceCategory::Flash,
            14 => DeviceCategory::HostBoard,
            15 => DeviceCategory::Midplane,
            16 => DeviceCategory::Drawer,
            17 => DeviceCategory::Slot,
            18 => DeviceCategory::EnclosureServices,
            0 | 7 | 19..=31 => DeviceCategory::Undocumented,
            _ => return Err(DecodeError::UnmappedDeviceType(code)),
        };
        Ok(category)
    }

    /// Tag used to blacklist the category.
    pub fn tag(self) -> &'static str {
        match self {
            DeviceCategory::PowerSupply => "power_supply",
            DeviceCategory::Fan => "fan",
            DeviceCategory::Temperature => "temperature",
            DeviceCategory::Ups => "ups",
            DeviceCategory::Voltage => "voltage",
            DeviceCategory::Current => "current",
            DeviceCategory::Door => "door",
            DeviceCategory::Speaker => "speaker",
            DeviceCategory::Battery => "battery",
            DeviceCategory::Slot => "slot",
            DeviceCategory::Led => "led",
            DeviceCategory::Flash => "flash",
            DeviceCategory::EnclosureServices => "enclosure_services",
            DeviceCategory::HostBoard => "host_board",
            DeviceCategory::Midplane => "midplane",
            DeviceCategory::Drawer => "drawer",
            DeviceCategory::Undocumented => "undocumented",
        }
    }

    /// Category for a blacklist tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.tag() == tag)
    }

    /// Interpret one reading of this category.
    ///
    /// Fan and temperature readings always produce a performance sample,
    /// even when their status is nominal.
    pub fn classify(self, reading: &SensorReading, thresholds: &Thresholds) -> Result<DeviceOutcome, DecodeError> {
        let bits = StatusBits::new(reading.status);
        debug!(
            device = %reading.description,
            category = self.tag(),
            status = reading.status,
            bits = %bits,
            value = reading.value,
            unit = reading.unit,
            "classifying device"
        );

        let subject = reading.description.as_str();
        let outcome = match self {
            DeviceCategory::PowerSupply => DeviceOutcome::findings(run_checks(subject, &bits, POWER_SUPPLY)),
            DeviceCategory::Speaker => DeviceOutcome::findings(run_checks(subject, &bits, SPEAKER)),
            DeviceCategory::Door => DeviceOutcome::findings(run_checks(subject, &bits, DOOR)),
            DeviceCategory::Slot => DeviceOutcome::findings(run_checks(subject, &bits, SLOT)),
            DeviceCategory::Led => DeviceOutcome::findings(run_checks(subject, &bits, LED)),
            DeviceCategory::Flash => DeviceOutcome::findings(run_checks(subject, &bits, FLASH)),
            DeviceCategory::Battery => DeviceOutcome::findings(run_checks(subject, &bits, BATTERY)),
            DeviceCategory::Voltage => DeviceOutcome::findings(run_checks(subject, &bits, VOLTAGE)),
            DeviceCategory::Current => DeviceOutcome::findings(run_checks(subject, &bits, CURRENT)),
            DeviceCategory::Ups => ups(subject, reading.status, &bits),
            DeviceCategory::Fan => fan(reading, &bits, thresholds)?,
            DeviceCategory::Temperature => temperature(reading, &bits, thresholds),
            DeviceCategory::EnclosureServices
            | DeviceCategory::HostBoard
            | DeviceCategory::Midplane
            | DeviceCategory::Drawer => pass_fail(subject, &bits),
            DeviceCategory::Undocumented => DeviceOutcome::default(),
        };
        Ok(outcome)
    }
}

/// What one classifier reports for one reading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceOutcome {
    pub findings: Vec<Finding>,
    pub sample: Option<PerformanceSample>,
}

impl DeviceOutcome {
    fn findings(findings: Vec<Finding>) -> Self {
        Self { findings, sample: None }
    }
}

/// One step of a classifier.
#[derive(Debug, Clone, Copy)]
enum Check {
    /// Report `message` when the bit at this position is set.
    Bit(usize, Severity, &'static str),
    /// Read positions `high..=low` as a numeral and report the matching case.
    Numeral {
        high: usize,
        low: usize,
        cases: &'static [(u32, Severity, &'static str)],
    },
}

fn run_checks(subject: &str, bits: &StatusBits, checks: &[Check]) -> Vec<Finding> {
    let mut findings = Vec::new();
    for check in checks {
        match *check {
            Check::Bit(pos, severity, message) => {
                if bits.is_set(pos) {
                    findings.push(Finding::new(subject, message, severity));
                }
            }
            Check::Numeral { high, low, cases } => {
                let Some(numeral) = bits.range(high, low) else {
                    continue;
                };
                if let Some((_, severity, message)) = cases.iter().find(|(n, _, _)| *n == numeral) {
                    findings.push(Finding::new(subject, *message, *severity));
                }
            }
        }
    }
    findings
}

const POWER_SUPPLY: &[Check] = &[
    Check::Bit(1, Critical, "Power supply is malfunctioning"),
    Check::Bit(7, Warning, "Power supply is off"),
    Check::Bit(8, Critical, "Power supply is not present"),
];

const SPEAKER: &[Check] = &[
    Check::Bit(1, Critical, "Speaker is malfunctioning"),
    Check::Bit(7, Warning, "Speaker is off"),
    Check::Bit(8, Critical, "Speaker is not present"),
];

const FAN: &[Check] = &[
    Check::Bit(1, Critical, "Fan is malfunctioning"),
    Check::Bit(7, Warning, "Fan is off"),
    Check::Bit(8, Critical, "Fan is not present"),
];

const DOOR: &[Check] = &[
    Check::Bit(1, Critical, "Door, door lock, or door sensor malfunctioning"),
    Check::Bit(2, Warning, "Door is open"),
    Check::Bit(7, Warning, "Door lock not engaged"),
    Check::Bit(8, Critical, "Door is not present"),
];

const SLOT: &[Check] = &[
    Check::Bit(1, Critical, "Slot sense circuitry is malfunctioning"),
    Check::Bit(2, Warning, "Device in slot has been marked bad and is awaiting a replacement"),
    Check::Bit(3, Warning, "Slot is not activated"),
    Check::Bit(7, Info, "Slot is ready for insertion/removal"),
    Check::Bit(8, Warning, "Slot is empty"),
];

const LED: &[Check] = &[Check::Bit(7, Info, "LED is active")];

const FLASH: &[Check] = &[Check::Bit(1, Critical, "Cache-data-backup flash device is malfunctioning")];

// Battery and UPS read their charge level from positions 4..=3, the
// sensors below read theirs from 4..=2.
const BATTERY: &[Check] = &[
    Check::Bit(1, Critical, "Battery is malfunctioning"),
    Check::Bit(2, Info, "Battery charging on"),
    Check::Numeral {
        high: 4,
        low: 3,
        cases: &[
            (1, Info, "Battery not fully charged"),
            (2, Critical, "Battery charge critically low"),
            (3, Critical, "Battery completely drained"),
        ],
    },
    // normal on controllers sold without a backup module
    Check::Bit(7, Info, "Battery-backup is disabled"),
    Check::Bit(8, Critical, "Battery is not present"),
];

const UPS: &[Check] = &[
    Check::Bit(1, Critical, "Unit is malfunctioning"),
    Check::Bit(2, Critical, "AC Power not present"),
    Check::Numeral {
        high: 4,
        low: 3,
        cases: &[
            (1, Warning, "Battery not fully charged"),
            (2, Critical, "Battery charge critically low"),
            (3, Critical, "Battery completely drained"),
        ],
    },
    Check::Bit(7, Warning, "UPS is off"),
    Check::Bit(8, Critical, "UPS is not present"),
];

const VOLTAGE: &[Check] = &[
    Check::Bit(1, Critical, "Voltage sensor is malfunctioning"),
    Check::Numeral {
        high: 4,
        low: 2,
        cases: &[
            (2, Warning, "Low voltage warning"),
            (3, Warning, "High voltage warning"),
            (4, Critical, "Low voltage limit exceeded"),
            (5, Critical, "High voltage limit exceeded"),
        ],
    },
    Check::Bit(7, Warning, "Voltage sensor is not activated"),
    Check::Bit(8, Critical, "Voltage sensor is not present"),
];

const CURRENT: &[Check] = &[
    Check::Bit(1, Critical, "Current sensor malfunctioning"),
    Check::Numeral {
        high: 4,
        low: 2,
        cases: &[
            (2, Warning, "Under current warning"),
            (3, Warning, "Over current warning"),
            (4, Critical, "Under current limit exceeded"),
            (5, Critical, "Over current limit exceeded"),
        ],
    },
    Check::Bit(7, Warning, "Current sensor is not activated"),
    Check::Bit(8, Critical, "Current sensor not present"),
];

const TEMPERATURE: &[Check] = &[
    Check::Bit(1, Critical, "Temperature sensor is malfunctioning"),
    Check::Numeral {
        high: 4,
        low: 2,
        cases: &[
            (2, Warning, "Cold temperature warning"),
            (3, Warning, "Hot temperature warning"),
            (4, Critical, "Cold temperature limit exceeded"),
            (5, Critical, "Hot temperature limit exceeded"),
        ],
    },
    Check::Bit(7, Warning, "Temperature sensor is not activated"),
    Check::Bit(8, Critical, "Temperature sensor is not present"),
];

/// Status word the UPS reports when its state is unknown.
const UPS_UNKNOWN_STATUS: u64 = 255;

fn ups(subject: &str, status: u64, bits: &StatusBits) -> DeviceOutcome {
    if status == UPS_UNKNOWN_STATUS {
        debug!(device = subject, "UPS state unknown, ignoring");
        return DeviceOutcome::default();
    }
    DeviceOutcome::findings(run_checks(subject, bits, UPS))
}

fn pass_fail(subject: &str, bits: &StatusBits) -> DeviceOutcome {
    let mut outcome = DeviceOutcome::default();
    if bits.is_set(1) {
        outcome
            .findings
            .push(Finding::critical(subject, format!("{} is malfunctioning", subject)));
    }
    outcome
}

fn fan(reading: &SensorReading, bits: &StatusBits, thresholds: &Thresholds) -> Result<DeviceOutcome, DecodeError> {
    let subject = reading.description.as_str();
    let rpm = units::fan_rpm(reading.value, reading.unit)?;
    debug!(device = subject, rpm, "fan speed");

    let mut findings = run_checks(subject, bits, FAN);
    if let Some((severity, threshold)) = thresholds.fan_speed_status(rpm) {
        findings.push(Finding::new(subject, format!("Fan speed is >= {}", threshold), severity));
    }

    Ok(DeviceOutcome {
        findings,
        sample: Some(thresholds.fan_sample(subject, rpm)),
    })
}

fn temperature(reading: &SensorReading, bits: &StatusBits, thresholds: &Thresholds) -> DeviceOutcome {
    let subject = reading.description.as_str();
    let celsius = units::celsius(reading.value, reading.unit);
    debug!(device = subject, celsius, "temperature");

    DeviceOutcome {
        findings: run_checks(subject, bits, TEMPERATURE),
        sample: Some(thresholds.temperature_sample(subject, celsius)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(type_code: i64, status: u64, value: i64, unit: i64) -> DeviceOutcome {
        let reading = SensorReading::new("dev", type_code, status, value, unit);
        DeviceCategory::from_type_code(type_code)
            .unwrap()
            .classify(&reading, &Thresholds::default())
            .unwrap()
    }

    fn messages(outcome: &DeviceOutcome) -> Vec<(&str, Severity)> {
        outcome
            .findings
            .iter()
            .map(|f| (f.message.as_str(), f.severity))
            .collect()
    }

    #[test]
    fn test_type_codes() {
        assert_eq!(DeviceCategory::from_type_code(2), Ok(DeviceCategory::Fan));
        assert_eq!(DeviceCategory::from_type_code(3), Ok(DeviceCategory::Temperature));
        assert_eq!(DeviceCategory::from_type_code(8), Ok(DeviceCategory::Temperature));
        assert_eq!(DeviceCategory::from_type_code(9), Ok(DeviceCategory::Door));
        assert_eq!(DeviceCategory::from_type_code(7), Ok(DeviceCategory::Undocumented));
        assert_eq!(
            DeviceCategory::from_type_code(99),
            Err(DecodeError::UnmappedDeviceType(99))
        );
    }

    #[test]
    fn test_tags_roundtrip() {
        for category in DeviceCategory::ALL {
            assert_eq!(DeviceCategory::from_tag(category.tag()), Some(category));
        }
        assert_eq!(DeviceCategory::from_tag("absent_drives"), None);
    }

    #[test]
    fn test_nominal_status_reports_nothing() {
        for code in [1, 4, 5, 6, 9, 10, 11, 12, 13, 14, 17, 18] {
            let outcome = classify(code, 0, 0, 0);
            assert!(outcome.findings.is_empty(), "type {}", code);
            assert!(outcome.sample.is_none(), "type {}", code);
        }
    }

    #[test]
    fn test_power_supply_bits() {
        let outcome = classify(1, 0b1100_0001, 0, 0);
        assert_eq!(
            messages(&outcome),
            vec![
                ("Power supply is malfunctioning", Critical),
                ("Power supply is off", Warning),
                ("Power supply is not present", Critical),
            ]
        );
    }

    #[test]
    fn test_speaker_off() {
        let outcome = classify(10, 0b100_0000, 0, 0);
        assert_eq!(messages(&outcome), vec![("Speaker is off", Warning)]);
    }

    #[test]
    fn test_door_open_without_presence_bit() {
        let outcome = classify(9, 0b100_0010, 0, 0);
        assert_eq!(
            messages(&outcome),
            vec![("Door is open", Warning), ("Door lock not engaged", Warning)]
        );
    }

    #[test]
    fn test_slot_ready_is_informational() {
        let outcome = classify(17, 0b100_0000, 0, 0);
        assert_eq!(messages(&outcome), vec![("Slot is ready for insertion/removal", Info)]);

        let outcome = classify(17, 0b1000_0110, 0, 0);
        assert_eq!(
            messages(&outcome),
            vec![
                ("Device in slot has been marked bad and is awaiting a replacement", Warning),
                ("Slot is not activated", Warning),
                ("Slot is empty", Warning),
            ]
        );
    }

    #[test]
    fn test_led_never_raises_severity() {
        let outcome = classify(12, 0b1111_1111, 0, 0);
        assert_eq!(messages(&outcome), vec![("LED is active", Info)]);
    }

    #[test]
    fn test_flash_malfunction() {
        let outcome = classify(13, 0b1, 0, 0);
        assert_eq!(
            messages(&outcome),
            vec![("Cache-data-backup flash device is malfunctioning", Critical)]
        );
    }

    #[test]
    fn test_pass_fail_names_device() {
        let reading = SensorReading::new("Midplane A", 15, 1, 0, 0);
        let outcome = DeviceCategory::Midplane
            .classify(&reading, &Thresholds::default())
            .unwrap();
        assert_eq!(outcome.findings, vec![Finding::critical("Midplane A", "Midplane A is malfunctioning")]);
    }

    #[test]
    fn test_battery_numeral() {
        // charging (position 2) and numeral 1 at positions 4..=3
        let outcome = classify(11, 0b0110, 0, 0);
        assert_eq!(
            messages(&outcome),
            vec![("Battery charging on", Info), ("Battery not fully charged", Info)]
        );

        let outcome = classify(11, 0b1000, 0, 0);
        assert_eq!(messages(&outcome), vec![("Battery charge critically low", Critical)]);

        let outcome = classify(11, 0b1100_1100, 0, 0);
        assert_eq!(
            messages(&outcome),
            vec![
                ("Battery completely drained", Critical),
                ("Battery-backup is disabled", Info),
                ("Battery is not present", Critical),
            ]
        );
    }

    #[test]
    fn test_short_status_skips_numeral() {
        // "10" does not reach position 3
        let outcome = classify(11, 0b10, 0, 0);
        assert_eq!(messages(&outcome), vec![("Battery charging on", Info)]);
    }

    #[test]
    fn test_ups_unknown_status_ignored() {
        let outcome = classify(4, 255, 0, 0);
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn test_ups_bits() {
        let outcome = classify(4, 0b0110, 0, 0);
        assert_eq!(
            messages(&outcome),
            vec![("AC Power not present", Critical), ("Battery not fully charged", Warning)]
        );
        let outcome = classify(4, 0b100_0000, 0, 0);
        assert_eq!(messages(&outcome), vec![("UPS is off", Warning)]);
    }

    #[test]
    fn test_voltage_numeral() {
        // positions 4..=2 = 0b010
        assert_eq!(messages(&classify(5, 0b0100, 0, 0)), vec![("Low voltage warning", Warning)]);
        assert_eq!(messages(&classify(5, 0b0110, 0, 0)), vec![("High voltage warning", Warning)]);
        assert_eq!(messages(&classify(5, 0b1000, 0, 0)), vec![("Low voltage limit exceeded", Critical)]);
        assert_eq!(
            messages(&classify(5, 0b1011, 0, 0)),
            vec![
                ("Voltage sensor is malfunctioning", Critical),
                ("High voltage limit exceeded", Critical),
            ]
        );
    }

    #[test]
    fn test_current_sensor() {
        assert_eq!(messages(&classify(6, 0b0110, 0, 0)), vec![("Over current warning", Warning)]);
        assert_eq!(
            messages(&classify(6, 0b1000_0000, 0, 0)),
            vec![("Current sensor not present", Critical)]
        );
    }

    #[test]
    fn test_fan_sample_emitted_when_nominal() {
        let outcome = classify(2, 0, 12292, -1);
        assert!(outcome.findings.is_empty());
        let sample = outcome.sample.unwrap();
        assert_eq!((sample.value, sample.warn, sample.crit), (4000, 5713, 5800));
    }

    #[test]
    fn test_fan_speed_findings() {
        let outcome = classify(2, 0, 5750, 1);
        assert_eq!(messages(&outcome), vec![("Fan speed is >= 5713", Warning)]);

        let outcome = classify(2, 0b1, 7, 0);
        assert_eq!(
            messages(&outcome),
            vec![("Fan is malfunctioning", Critical), ("Fan speed is >= 5800", Critical)]
        );
    }

    #[test]
    fn test_unknown_fan_code_is_an_error() {
        let reading = SensorReading::new("Fan 3", 2, 0, 12345, 1);
        let result = DeviceCategory::Fan.classify(&reading, &Thresholds::default());
        assert_eq!(result, Err(DecodeError::UnknownFanCode(12345)));
    }

    #[test]
    fn test_temperature_sample_and_bits() {
        let outcome = classify(3, 0b0111, 318, 1000);
        assert_eq!(
            messages(&outcome),
            vec![
                ("Temperature sensor is malfunctioning", Critical),
                ("Hot temperature warning", Warning),
            ]
        );
        let sample = outcome.sample.unwrap();
        assert_eq!((sample.value, sample.warn, sample.crit, sample.max), (45, 70, 80, 100));
    }

    #[test]
    fn test_zero_temperature_sample() {
        let outcome = classify(8, 0, 0, 1000);
        assert_eq!(outcome.sample.unwrap().value, 0);
    }

    #[test]
    fn test_undocumented_is_silent() {
        let outcome = classify(7, 0xFF, 123, 1);
        assert_eq!(outcome, DeviceOutcome::default());
    }
}
