//! Device table rows.

/// One row of the controller's device table.
///
/// Rows are assembled by position from the parallel description, type,
/// status, value and unit columns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorReading {
    /// Free-text device description reported by the controller.
    pub description: String,
    /// Vendor-assigned device type code.
    pub type_code: i64,
    /// Bit-encoded status word; zero means nominal.
    pub status: u64,
    /// Raw sensor magnitude (fan speed code, temperature sample, ...).
    pub value: i64,
    /// Unit or scale accompanying `value`.
    pub unit: i64,
}

impl SensorReading {
    /// Create a reading.
    pub fn new(description: impl Into<String>, type_code: i64, status: u64, value: i64, unit: i64) -> Self {
        Self {
            description: description.into(),
            type_code,
            status,
            value,
            unit,
        }
    }
}
