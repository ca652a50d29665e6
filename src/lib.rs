//! # raidwatch
//!
//! A monitoring check for Infortrend (and Sun StorEdge 3510/3511) RAID
//! controllers.
//!
//! The controller's management agent exposes raw status words, sensor
//! magnitudes and drive state codes. This crate fetches them into a
//! [`Snapshot`], decodes them into human-readable findings and performance
//! samples, and reduces everything to one verdict with a monitoring plugin
//! exit code.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌──────────┐   │
//! │  │ source  │───▶│ Snapshot │───▶│  decode  │───▶│  render  │   │
//! │  │ (query) │    │  (types) │    │ (Report) │    │ (stdout) │   │
//! │  └─────────┘    └──────────┘    └──────────┘    └──────────┘   │
//! │       ▲                               ▲                        │
//! │       └────────────── config ─────────┘                        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`QueryService`] seam, net-snmp backend, collector
//!   and JSON snapshot replay
//! - **[`decode`]**: bit and unit decoding, per-device classifiers, drive
//!   tables and the verdict
//! - **[`render`]**: the single status line
//! - **[`config`]**: layered settings
//!
//! ## Usage
//!
//! ```
//! use raidwatch::{render, Blacklist, Decoder, Snapshot, Thresholds, Verdict};
//!
//! let snapshot = Snapshot::builder()
//!     .device("Fan 0", 2, 0, 12292, -1)
//!     .device("Door", 9, 0b100_0010, 0, 0)
//!     .build();
//!
//! let decoder = Decoder::new(Blacklist::new(), Thresholds::default());
//! let report = decoder.run(&snapshot).unwrap();
//!
//! assert_eq!(report.verdict(), Verdict::Warning);
//! assert!(render::status_line(&report).starts_with("WARNING: "));
//! ```

pub mod config;
pub mod decode;
pub mod error;
pub mod render;
pub mod source;

pub use config::{Overrides, Settings};
pub use decode::{Blacklist, Decoder, DeviceCategory, Report, Thresholds};
pub use error::{DecodeError, SettingsError, SourceError};
pub use source::{Collector, FileSource, QueryService, SnapshotSource, SnmpCli, SnmpSource};

pub use raidwatch_types::{
    Finding, PerformanceSample, QueryResult, QueryValue, SensorReading, Severity, Snapshot, Verdict,
};
