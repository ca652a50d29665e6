//! Status word bit access.
//!
//! Status words are addressed from the least-significant end with 1-based
//! positions. The binary form carries no leading zeros, so positions past
//! the highest set bit simply do not exist: they read as absent, which the
//! classifiers treat as "not set".

use std::fmt;

/// The binary digits of a status word, most significant first, unpadded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBits {
    digits: Vec<bool>,
}

impl StatusBits {
    /// Binary digits of `status`. Zero has no digits at all.
    pub fn new(status: u64) -> Self {
        let width = (u64::BITS - status.leading_zeros()) as usize;
        let digits = (0..width).rev().map(|shift| (status >> shift) & 1 == 1).collect();
        Self { digits }
    }

    /// Number of digits, `floor(log2(status)) + 1` for a non-zero status.
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// The bit at 1-based position `from_end`, counted from the least
    /// significant end, or `None` when the word is too short to have it.
    pub fn bit(&self, from_end: usize) -> Option<bool> {
        if from_end == 0 || from_end > self.digits.len() {
            return None;
        }
        Some(self.digits[self.digits.len() - from_end])
    }

    /// True only when the bit exists and is set.
    pub fn is_set(&self, from_end: usize) -> bool {
        self.bit(from_end) == Some(true)
    }

    /// Unsigned value of positions `high..=low` (both counted from the least
    /// significant end, `high >= low`).
    ///
    /// Returns `None` when even the lowest position of the range is past the
    /// end of the word. A range that is only partly present reads its
    /// missing high positions as zero.
    pub fn range(&self, high: usize, low: usize) -> Option<u32> {
        debug_assert!(high >= low && low >= 1);
        self.bit(low)?;
        let value = (low..=high)
            .rev()
            .fold(0, |acc, pos| (acc << 1) | u32::from(self.is_set(pos)));
        Some(value)
    }
}

impl fmt::Display for StatusBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &digit in &self.digits {
            f.write_str(if digit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
