//! Excel-letter column addressing

use crate::error::{PressdropError, Result};

/// Convert an Excel column label to a zero-based index ("A" -> 0, "H" -> 7,
/// "AA" -> 26).
pub fn column_index(label: &str) -> Result<usize> {
    let label = label.trim();
    if label.is_empty() {
        return Err(PressdropError::InvalidColumn("empty column label".to_string()));
    }

    let mut index: usize = 0;
    for c in label.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return Err(PressdropError::InvalidColumn(format!(
                "invalid character '{c}' in column label '{label}'"
            )));
        }
        index = index * 26 + (c as usize - 'A' as usize + 1);
    }

    Ok(index - 1)
}

/// An inclusive range of spreadsheet columns, e.g. "H:O".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRange {
    start: usize,
    end: usize,
}

impl ColumnRange {
    /// Build a range from zero-based start and end indices (inclusive).
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if end < start {
            return Err(PressdropError::InvalidColumn(format!(
                "range end ({end}) before start ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse an Excel-style range spec: "H:O" or a single column "H".
    pub fn parse(spec: &str) -> Result<Self> {
        match spec.split_once(':') {
            Some((lo, hi)) => Self::new(column_index(lo)?, column_index(hi)?),
            None => {
                let idx = column_index(spec)?;
                Self::new(idx, idx)
            }
        }
    }

    /// Zero-based indices covered by this range.
    pub fn indices(&self) -> Vec<usize> {
        (self.start..=self.end).collect()
    }

    /// Number of columns in the range. Always at least 1; `new` rejects
    /// an end before the start.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}
