//! Index and slice resolution
//!
//! Every positional operation on a synced sequence goes through this module,
//! so reads, assignments and deletions share one bounds-checking rule:
//!
//! - negative indices wrap once (`len + index`) and fail if still negative
//! - non-negative indices fail when `>= len`
//! - slices follow start/stop/step semantics with clamped bounds, and the
//!   positions they produce are checked with the integer rule above
//!
//! ```text
//! [a, b, c, d]      Slice::with_step(None, None, 2)  -> 0, 2
//!                   Slice::with_step(None, None, -1) -> 3, 2, 1, 0
//!                   Slice::range(-3, -1)             -> 1, 2
//! ```

use crate::error::{Result, SequenceError};
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// Resolve a possibly-negative index against `len`
///
/// # Examples
///
/// ```
/// use syncseq_core::index::resolve_index;
///
/// assert_eq!(resolve_index(-1, 3).unwrap(), 2);
/// assert_eq!(resolve_index(-3, 3).unwrap(), 0);
/// assert!(resolve_index(-4, 3).is_err());
/// assert!(resolve_index(3, 3).is_err());
/// ```
pub fn resolve_index(index: isize, len: usize) -> Result<usize> {
    let out_of_range = || SequenceError::OutOfRange { index, len };
    if index < 0 {
        let wrapped = len as isize + index;
        if wrapped < 0 {
            return Err(out_of_range());
        }
        return Ok(wrapped as usize);
    }
    let index_u = index as usize;
    if index_u >= len {
        return Err(out_of_range());
    }
    Ok(index_u)
}

/// Resolve an insertion position against `len`
///
/// `len` itself is accepted without a bounds check (append). Anything below
/// `len` resolves through [`resolve_index`]; anything above is out of range.
pub fn resolve_insert_index(index: isize, len: usize) -> Result<usize> {
    if index == len as isize {
        return Ok(len);
    }
    if index < len as isize {
        return resolve_index(index, len);
    }
    Err(SequenceError::OutOfRange { index, len })
}

/// A start/stop/step selection over a sequence
///
/// `None` bounds mean "from the natural end for this direction". A `None`
/// step is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Slice {
    /// First position (inclusive)
    pub start: Option<isize>,
    /// Last position (exclusive)
    pub stop: Option<isize>,
    /// Distance between positions; negative walks backwards
    pub step: Option<isize>,
}

impl Slice {
    /// Create a slice from raw parts
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Slice { start, stop, step }
    }

    /// Every position, front to back
    pub fn full() -> Self {
        Slice::default()
    }

    /// `start..stop` with step 1
    pub fn range(start: isize, stop: isize) -> Self {
        Slice::new(Some(start), Some(stop), None)
    }

    /// `start..`
    pub fn from_start(start: isize) -> Self {
        Slice::new(Some(start), None, None)
    }

    /// `..stop`
    pub fn to_end(stop: isize) -> Self {
        Slice::new(None, Some(stop), None)
    }

    /// Arbitrary bounds with an explicit step
    pub fn with_step(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Slice::new(start, stop, Some(step))
    }

    /// Resolve against a sequence of length `len`
    ///
    /// Fails with [`SequenceError::InvalidSlice`] when the step is zero.
    pub fn resolve(&self, len: usize) -> Result<SliceIndices> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(SequenceError::InvalidSlice);
        }

        let len_i = len as isize;
        let (lower, upper) = if step < 0 { (-1, len_i - 1) } else { (0, len_i) };
        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + len_i).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = match self.start {
            Some(s) => clamp(s),
            None if step < 0 => upper,
            None => lower,
        };
        let stop = match self.stop {
            Some(s) => clamp(s),
            None if step < 0 => lower,
            None => upper,
        };

        // Both bounds lie in [-1, len], so the span never overflows; the
        // stride stays unsigned so `isize::MIN` has a magnitude.
        let span = if step > 0 { stop - start } else { start - stop };
        let count = if span > 0 {
            (span as usize - 1) / step.unsigned_abs() + 1
        } else {
            0
        };

        Ok(SliceIndices {
            start,
            step,
            count,
            pos: 0,
            len,
        })
    }
}

impl From<Range<isize>> for Slice {
    fn from(r: Range<isize>) -> Self {
        Slice::range(r.start, r.end)
    }
}

impl From<RangeFrom<isize>> for Slice {
    fn from(r: RangeFrom<isize>) -> Self {
        Slice::from_start(r.start)
    }
}

impl From<RangeTo<isize>> for Slice {
    fn from(r: RangeTo<isize>) -> Self {
        Slice::to_end(r.end)
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::full()
    }
}

/// Lazily produced positions of a resolved [`Slice`]
///
/// Finite and restartable: clone it, or call [`SliceIndices::restart`], to
/// walk the same positions again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceIndices {
    start: isize,
    step: isize,
    count: usize,
    pos: usize,
    len: usize,
}

impl SliceIndices {
    /// Rewind to the first position
    pub fn restart(&mut self) {
        self.pos = 0;
    }

    /// Length the slice was resolved against
    pub fn resolved_len(&self) -> usize {
        self.len
    }
}

impl Iterator for SliceIndices {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.pos < self.count {
            let offset = (self.pos as i128) * (self.step as i128);
            self.pos += 1;
            let Ok(raw) = isize::try_from(self.start as i128 + offset) else {
                continue;
            };
            if let Ok(index) = resolve_index(raw, self.len) {
                return Some(index);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SliceIndices {}
