//! Snapshot sources.
//!
//! A check run needs one [`Snapshot`] of the controller. This module
//! provides a trait-based abstraction for obtaining it, either live from the
//! management agent or from a file written by an earlier run.
//!
//! ```text
//! SnmpSource ──▶ discover_base() ──▶ Collector<SnmpCli> ──┐
//!                                                         ├──▶ Snapshot
//! FileSource ──▶ JSON ────────────────────────────────────┘
//! ```

mod collector;
mod file;
mod snmp;

pub use collector::{discover_base, Collector, BASE_ADDRESSES};
pub use file::{dump, FileSource};
pub use snmp::{parse_output, SnmpCli, SnmpSource};

use std::fmt::Debug;

use raidwatch_types::{QueryResult, Snapshot};

use crate::error::SourceError;

/// A service that answers single-value gets and table walks.
///
/// The production implementation shells out to net-snmp; tests use an
/// in-memory table.
pub trait QueryService: Debug {
    /// Fetch one value. The result is a [`QueryResult::Scalar`].
    fn get(&self, oid: &str) -> Result<QueryResult, SourceError>;

    /// Fetch every value under a table column. The result is a
    /// [`QueryResult::List`] in agent order.
    fn walk(&self, oid: &str) -> Result<QueryResult, SourceError>;
}

/// Trait for obtaining one snapshot per check run.
///
/// # Example
///
/// ```no_run
/// use raidwatch::{FileSource, SnapshotSource};
///
/// let mut source = FileSource::new("snapshot.json");
/// let snapshot = source.fetch()?;
/// println!("{} devices", snapshot.devices.len());
/// # Ok::<(), raidwatch::SourceError>(())
/// ```
pub trait SnapshotSource: Send + Debug {
    /// Fetch a complete snapshot. This may block on I/O.
    fn fetch(&mut self) -> Result<Snapshot, SourceError>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;
}
