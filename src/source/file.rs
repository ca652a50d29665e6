//! File-based snapshot source.
//!
//! Replays a JSON snapshot written by an earlier run with `--dump`.

use std::fs;
use std::path::{Path, PathBuf};

use raidwatch_types::Snapshot;
use tracing::debug;

use super::SnapshotSource;
use crate::error::SourceError;

/// A source that reads one snapshot from a JSON file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for FileSource {
    fn fetch(&mut self) -> Result<Snapshot, SourceError> {
        let content = fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        if !snapshot.is_compatible() {
            return Err(SourceError::IncompatibleSnapshot(snapshot.version));
        }
        debug!(path = %self.path.display(), devices = snapshot.devices.len(), "loaded snapshot");
        Ok(snapshot)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// Write a snapshot as pretty JSON.
pub fn dump<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<(), SourceError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path.as_ref(), json)?;
    debug!(path = %path.as_ref().display(), "wrote snapshot");
    Ok(())
}
