//! Operator-selected categories to leave out of a run.

use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

use super::device::DeviceCategory;

/// Tag that suppresses findings for drives reporting "absent".
pub const ABSENT_DRIVES: &str = "absent_drives";

/// A blacklist entry that names no known category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown blacklist tag {tag:?} (known tags: {known})")]
pub struct UnknownTag {
    pub tag: String,
    known: String,
}

/// Set of categories excluded from evaluation.
///
/// Parsed once from configuration and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    devices: BTreeSet<DeviceCategory>,
    absent_drives: bool,
}

impl Blacklist {
    /// An empty blacklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a list of tags, ignoring blanks and surrounding whitespace.
    pub fn from_tags<I, S>(tags: I) -> Result<Self, UnknownTag>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut blacklist = Self::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() {
                continue;
            }
            if tag == ABSENT_DRIVES {
                blacklist.absent_drives = true;
            } else if let Some(category) = DeviceCategory::from_tag(tag) {
                blacklist.devices.insert(category);
            } else {
                return Err(UnknownTag {
                    tag: tag.to_string(),
                    known: known_tags().join(", "),
                });
            }
        }
        Ok(blacklist)
    }

    /// Exclude a device category.
    pub fn with_device(mut self, category: DeviceCategory) -> Self {
        self.devices.insert(category);
        self
    }

    /// Exclude absent drive reports.
    pub fn with_absent_drives(mut self) -> Self {
        self.absent_drives = true;
        self
    }

    pub fn contains(&self, category: DeviceCategory) -> bool {
        self.devices.contains(&category)
    }

    pub fn skips_absent_drives(&self) -> bool {
        self.absent_drives
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && !self.absent_drives
    }
}

impl FromStr for Blacklist {
    type Err = UnknownTag;

    /// Parse a comma-separated tag list such as `"battery,absent_drives"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tags(s.split(','))
    }
}

fn known_tags() -> Vec<&'static str> {
    DeviceCategory::ALL
        .iter()
        .map(|category| category.tag())
        .chain(std::iter::once(ABSENT_DRIVES))
        .collect()
}
