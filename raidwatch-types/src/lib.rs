//! # raidwatch-types
//!
//! Core types for storage controller health checks. These types are the
//! shared vocabulary between whatever fetches readings from a controller's
//! management agent and the decoder that turns them into a verdict.
//!
//! ## Overview
//!
//! - [`QueryValue`] / [`QueryResult`]: typed values returned by one fetch
//! - [`SensorReading`]: one row of the controller's device table
//! - [`Finding`] / [`Severity`]: one diagnostic statement
//! - [`PerformanceSample`]: a numeric sample with its thresholds
//! - [`Verdict`]: the worst-case summary of a whole run
//! - [`Snapshot`]: every reading fetched for one check run
//!
//! ## Features
//!
//! - `serde`: JSON (or any serde format) support for all types, used to
//!   dump and replay snapshots
//!
//! ## Example
//!
//! ```rust
//! use raidwatch_types::Snapshot;
//!
//! let snapshot = Snapshot::builder()
//!     .vendor("Infortrend")
//!     .model("EonStor A16F")
//!     .device("Fan 0", 2, 0, 12292, -1)
//!     .device("CPU temperature", 3, 0, 0, 0)
//!     .drive_status(1)
//!     .build();
//!
//! assert_eq!(snapshot.devices.len(), 2);
//! assert_eq!(snapshot.drives.drive_status, vec![1]);
//! ```

mod finding;
mod query;
mod reading;
mod snapshot;

pub use finding::*;
pub use query::*;
pub use reading::*;
pub use snapshot::*;

/// Current snapshot format version.
///
/// Bump this when a stored snapshot can no longer be read by a newer build.
pub const SCHEMA_VERSION: u32 = 1;
