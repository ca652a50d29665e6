//! Conversion of raw fan and temperature magnitudes into rpm and Celsius.

use raidwatch_types::{PerformanceSample, Severity};

use crate::error::DecodeError;

/// Legacy coded fan speeds, each standing for the top of an rpm band.
const LEGACY_FAN_CODES: &[(i64, i64)] = &[
    (0, 0),
    (12292, 4000),
    (77828, 4285),
    (143364, 4570),
    (208900, 4571),
    (274436, 4857),
    (339972, 5428),
    (405508, 5713),
    (471044, 5800),
];

/// Relative fan speed levels 0-7.
const RELATIVE_FAN_SPEEDS: [i64; 8] = [4571, 4000, 4285, 4570, 4857, 5428, 5713, 5800];

/// Magnitudes above this are legacy codes rather than rpm or levels.
const LEGACY_FAN_FLOOR: i64 = 10000;

/// Thresholds attached to fan and temperature performance samples.
///
/// Only the fan thresholds raise findings; temperature thresholds are
/// reported alongside the sample for graphing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    pub fan_warning: i64,
    pub fan_critical: i64,
    pub fan_min: i64,
    pub fan_max: i64,
    pub temperature_warning: i64,
    pub temperature_critical: i64,
    pub temperature_min: i64,
    pub temperature_max: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            fan_warning: 5713,
            fan_critical: 5800,
            fan_min: 0,
            fan_max: 6000,
            temperature_warning: 70,
            temperature_critical: 80,
            temperature_min: 0,
            temperature_max: 100,
        }
    }
}

impl Thresholds {
    /// Performance sample for a fan running at `rpm`.
    pub fn fan_sample(&self, label: &str, rpm: i64) -> PerformanceSample {
        PerformanceSample {
            label: label.to_string(),
            value: rpm,
            warn: self.fan_warning,
            crit: self.fan_critical,
            min: self.fan_min,
            max: self.fan_max,
        }
    }

    /// Performance sample for a temperature in Celsius.
    pub fn temperature_sample(&self, label: &str, celsius: i64) -> PerformanceSample {
        PerformanceSample {
            label: label.to_string(),
            value: celsius,
            warn: self.temperature_warning,
            crit: self.temperature_critical,
            min: self.temperature_min,
            max: self.temperature_max,
        }
    }

    /// Severity and crossed threshold for a fan speed, if any.
    pub fn fan_speed_status(&self, rpm: i64) -> Option<(Severity, i64)> {
        if rpm >= self.fan_critical {
            Some((Severity::Critical, self.fan_critical))
        } else if rpm >= self.fan_warning {
            Some((Severity::Warning, self.fan_warning))
        } else {
            None
        }
    }
}

/// Fan speed in rpm from a raw value and its unit.
///
/// Stale high bits above 16 are dropped first. What remains above 10000 is
/// a legacy code that must match the table exactly. Otherwise a unit of 0
/// or -1 marks a relative level 0-7 and any other unit means plain rpm.
/// Relative levels outside 0-7 read as level 0.
pub fn fan_rpm(value: i64, unit: i64) -> Result<i64, DecodeError> {
    let value = if value > 0xFFFF { value & 0xFFFF } else { value };

    if value > LEGACY_FAN_FLOOR {
        return LEGACY_FAN_CODES
            .iter()
            .find(|(code, _)| *code == value)
            .map(|(_, rpm)| *rpm)
            .ok_or(DecodeError::UnknownFanCode(value));
    }

    match unit {
        0 | -1 => Ok(usize::try_from(value)
            .ok()
            .and_then(|level| RELATIVE_FAN_SPEEDS.get(level))
            .copied()
            .unwrap_or(RELATIVE_FAN_SPEEDS[0])),
        _ => Ok(value),
    }
}

/// Temperature in whole degrees Celsius from a raw sample and its scale.
///
/// Samples above 16 bits carry the reading in the upper half. A reading of
/// exactly zero is reported as 0°C rather than as -273°C.
pub fn celsius(value: i64, unit: i64) -> i64 {
    let value = if value > 0xFFFF { value >> 16 } else { value };
    if value == 0 {
        return 0;
    }
    value.saturating_mul(unit) / 1000 - 273
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_fan_code() {
        assert_eq!(fan_rpm(12292, 0), Ok(4000));
        assert_eq!(fan_rpm(12292, 1), Ok(4000));
        assert_eq!(fan_rpm(12292, -1), Ok(4000));
    }

    #[test]
    fn test_fan_high_bits_masked() {
        // 77828 is 12292 with bit 16 set
        assert_eq!(fan_rpm(77828, 1), Ok(4000));
        assert_eq!(fan_rpm(0x1_0000 + 500, 1), Ok(500));
    }

    #[test]
    fn test_unknown_legacy_code_is_an_error() {
        assert_eq!(fan_rpm(12345, 1), Err(DecodeError::UnknownFanCode(12345)));
    }

    #[test]
    fn test_relative_fan_speed() {
        assert_eq!(fan_rpm(0, 0), Ok(4571));
        assert_eq!(fan_rpm(1, -1), Ok(4000));
        assert_eq!(fan_rpm(7, 0), Ok(5800));
    }

    #[test]
    fn test_relative_fan_out_of_range_reads_level_zero() {
        assert_eq!(fan_rpm(500, 0), Ok(4571));
        assert_eq!(fan_rpm(8, -1), Ok(4571));
        assert_eq!(fan_rpm(-2, 0), Ok(4571));
    }

    #[test]
    fn test_fan_rpm_passthrough() {
        assert_eq!(fan_rpm(500, 1), Ok(500));
        assert_eq!(fan_rpm(10000, 1), Ok(10000));
    }

    #[test]
    fn test_fan_speed_status() {
        let t = Thresholds::default();
        assert_eq!(t.fan_speed_status(4000), None);
        assert_eq!(t.fan_speed_status(5713), Some((Severity::Warning, 5713)));
        assert_eq!(t.fan_speed_status(5800), Some((Severity::Critical, 5800)));
    }

    #[test]
    fn test_zero_temperature() {
        assert_eq!(celsius(0, 1000), 0);
        assert_eq!(celsius(0, 0), 0);
    }

    #[test]
    fn test_temperature_formula() {
        // 318 K at unit 1000
        assert_eq!(celsius(318, 1000), 45);
        // integer division truncates
        assert_eq!(celsius(3185, 100), 45);
    }

    #[test]
    fn test_temperature_shifted_sample() {
        let c = celsius(547603968, 1000);
        assert_eq!(c, (547603968 >> 16) - 273);
        assert!((-273..=10000).contains(&c));
    }

    #[test]
    fn test_samples_carry_thresholds() {
        let t = Thresholds::default();
        let fan = t.fan_sample("Fan 0", 4000);
        assert_eq!((fan.value, fan.warn, fan.crit, fan.min, fan.max), (4000, 5713, 5800, 0, 6000));
        let temp = t.temperature_sample("CPU", 45);
        assert_eq!((temp.value, temp.warn, temp.crit, temp.min, temp.max), (45, 70, 80, 0, 100));
    }
}
