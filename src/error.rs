//! Error types for decoding and collecting readings.

use thiserror::Error;

/// Errors raised while interpreting readings.
///
/// Only [`DecodeError::ColumnMismatch`] and [`DecodeError::NegativeStatus`]
/// abort a run; the others are recorded against the single reading that
/// caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The device table columns do not line up.
    #[error(
        "device table columns differ in length (descriptions={descriptions}, types={types}, statuses={statuses}, values={values}, units={units})"
    )]
    ColumnMismatch {
        descriptions: usize,
        types: usize,
        statuses: usize,
        values: usize,
        units: usize,
    },

    /// A status word that cannot be a bitfield.
    #[error("device {index} reported negative status {status}")]
    NegativeStatus { index: usize, status: i64 },

    /// No classifier is known for this hardware.
    #[error("unmapped device type code {0}")]
    UnmappedDeviceType(i64),

    /// A legacy fan speed code that is not in the conversion table.
    #[error("unknown fan speed code {0}")]
    UnknownFanCode(i64),
}

/// Errors that can occur when fetching readings.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The query tool is not installed or not executable.
    #[error("{0} is not available in your path, or is not executable by you")]
    MissingTool(String),

    /// The query tool ran but failed.
    #[error("query {oid} failed: {message}")]
    Query { oid: String, message: String },

    /// The agent answered with something other than what was asked for.
    #[error("unexpected value at {oid}: expected {expected}, got {got:?}")]
    UnexpectedValue {
        oid: String,
        expected: &'static str,
        got: String,
    },

    /// None of the known base addresses answered.
    #[error("unable to auto detect array type at host {0}")]
    NoBaseAddress(String),

    /// The snapshot was written by an incompatible version.
    #[error("snapshot version {0} is not supported")]
    IncompatibleSnapshot(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors in layered settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Blacklist(#[from] crate::decode::UnknownTag),
}
