//! Row partitioning
//!
//! Splits the `out_height` rows of the output canvas between participants:
//!
//! ```text
//! base = out_height / count                       (floor)
//! coordinator (0): start = 0,                     count = out_height - (count - 1) * base
//! participant k:   start = out_height - k * base, count = base
//! ```
//!
//! The coordinator takes the leading block plus the remainder; higher
//! indices walk backward from the bottom edge in `base`-sized steps, so
//! ranges are not in rank order. Together they tile `[0, out_height)`.
//! Gather offsets are derived from the same formula, so any change here
//! changes the byte layout every participant agrees on.

use crate::{DistError, DistResult};
use std::ops::Range;

/// Half-open interval `[start, start + count)` of output rows.
///
/// `count <= 0` means the participant computes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRange {
    pub start: i64,
    pub count: i64,
}

impl RowRange {
    /// True when the participant owns no rows.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count <= 0
    }

    /// Number of owned rows, zero for empty ranges.
    #[inline]
    pub fn rows(&self) -> usize {
        self.count.max(0) as usize
    }

    /// Exclusive end row.
    #[inline]
    pub fn end(&self) -> i64 {
        self.start + self.count.max(0)
    }

    /// Owned rows as a `u32` range, empty when the range is empty.
    pub fn as_range(&self) -> Range<u32> {
        if self.is_empty() {
            return 0..0;
        }
        self.start as u32..self.end() as u32
    }
}

/// Row range owned by `index` out of `participants` for an output of
/// `out_height` rows.
///
/// # Errors
///
/// Returns [`DistError::InvalidGroup`] if `participants` is zero or
/// `index >= participants`.
pub fn partition(out_height: u32, participants: usize, index: usize) -> DistResult<RowRange> {
    if participants == 0 {
        return Err(DistError::InvalidGroup("participant count is 0".to_string()));
    }
    if index >= participants {
        return Err(DistError::InvalidGroup(format!(
            "participant index {index} out of {participants}"
        )));
    }

    let height = i64::from(out_height);
    let count = participants as i64;
    let base = height / count;

    if index == 0 {
        return Ok(RowRange {
            start: 0,
            count: height - (count - 1) * base,
        });
    }

    Ok(RowRange {
        start: height - index as i64 * base,
        count: base,
    })
}
