//! Backing storage with position/limit/mark/capacity cursor semantics.

use crate::{DyBufError, Result};

/// Capacities below this are rounded up to [`SMALL_GRANULARITY`].
pub const SMALL_THRESHOLD: usize = 1024;
/// Capacities below this (and at least [`SMALL_THRESHOLD`]) are rounded up
/// to [`MEDIUM_GRANULARITY`].
pub const MEDIUM_THRESHOLD: usize = 1024 * 1024;
pub const SMALL_GRANULARITY: usize = 64;
pub const MEDIUM_GRANULARITY: usize = 128;
pub const LARGE_GRANULARITY: usize = 1024;

/// Rounds a requested capacity up to its size class, or `None` when the
/// rounded size does not fit in `usize`.
///
/// ```
/// use dybuf::size_class;
///
/// assert_eq!(size_class(1), Some(64));
/// assert_eq!(size_class(1024), Some(1024));
/// assert_eq!(size_class(1025), Some(1152));
/// assert_eq!(size_class(1024 * 1024 + 1), Some(1024 * 1024 + 1024));
/// assert_eq!(size_class(usize::MAX), None);
/// ```
pub fn size_class(requested: usize) -> Option<usize> {
    let granularity = if requested < SMALL_THRESHOLD {
        SMALL_GRANULARITY
    } else if requested < MEDIUM_THRESHOLD {
        MEDIUM_GRANULARITY
    } else {
        LARGE_GRANULARITY
    };
    requested.div_ceil(granularity).checked_mul(granularity)
}

/// A contiguous byte region with `capacity`, `limit`, `position` and `mark`.
///
/// `0 <= mark <= limit`, `0 <= position <= limit` and `limit <= capacity`
/// hold after every operation. The region is replaced wholesale when it
/// grows; previously valid bytes are copied into the prefix of the new one.
///
/// `Cursor` is what a [`Backend`](crate::Backend) sees: a backend that loads
/// data lazily writes into [`storage_mut`](Cursor::storage_mut) and moves
/// the limit with [`set_limit`](Cursor::set_limit).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    data: Vec<u8>,
    limit: usize,
    position: usize,
    mark: usize,
}

impl Cursor {
    /// Creates an empty cursor over `capacity` zeroed bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            limit: 0,
            position: 0,
            mark: 0,
        }
    }

    /// Wraps `data`; every byte is valid (`limit == capacity == len`).
    pub fn from_vec(data: Vec<u8>) -> Self {
        let limit = data.len();
        Self {
            data,
            limit,
            position: 0,
            mark: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the remembered mark.
    #[inline]
    pub fn mark_position(&self) -> usize {
        self.mark
    }

    /// Returns `limit - position`.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.limit - self.position
    }

    #[inline]
    pub fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Moves the cursor.
    ///
    /// Fails when `position > limit`. A target below the mark is clamped
    /// up to the mark; the mark is kept.
    pub fn set_position(&mut self, position: usize) -> Result<()> {
        if position > self.limit {
            return Err(DyBufError::PositionOutOfRange {
                position,
                limit: self.limit,
            });
        }
        self.position = position.max(self.mark);
        Ok(())
    }

    /// Moves the limit, growing the storage when it exceeds the capacity.
    ///
    /// Mark and position are clamped down to the new limit. Fails with
    /// [`DyBufError::LengthTooLarge`] when the storage cannot grow that far.
    pub fn set_limit(&mut self, limit: usize) -> Result<()> {
        if limit > self.capacity() {
            self.set_capacity(limit)?;
        }
        self.limit = limit;
        self.mark = self.mark.min(limit);
        self.position = self.position.min(limit);
        Ok(())
    }

    /// Reallocates the storage to the size class of `capacity`.
    ///
    /// No-op when `capacity` equals the current capacity. Existing bytes
    /// are kept in the prefix; a shrink clamps limit, position and mark.
    ///
    /// Fails with [`DyBufError::LengthTooLarge`], leaving the cursor
    /// untouched, when the rounded size overflows or cannot be allocated.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity == self.capacity() {
            return Ok(());
        }
        let too_large = || DyBufError::LengthTooLarge(capacity as u64);
        let rounded = size_class(capacity).ok_or_else(too_large)?;
        log::trace!("dybuf capacity {} -> {}", self.capacity(), rounded);
        if rounded > self.data.len() {
            self.data
                .try_reserve_exact(rounded - self.data.len())
                .map_err(|_| too_large())?;
        }
        self.data.resize(rounded, 0);
        self.data.shrink_to(rounded);
        self.limit = self.limit.min(rounded);
        self.position = self.position.min(rounded);
        self.mark = self.mark.min(rounded);
        Ok(())
    }

    /// Remembers the current position.
    pub fn mark(&mut self) -> &mut Self {
        self.mark = self.position;
        self
    }

    /// Returns to the remembered position.
    pub fn reset(&mut self) -> &mut Self {
        self.position = self.mark;
        self
    }

    /// Prepares for writing from scratch: `position = mark = 0`,
    /// `limit = capacity`.
    pub fn clear(&mut self) -> &mut Self {
        self.position = 0;
        self.mark = 0;
        self.limit = self.capacity();
        self
    }

    /// Switches a just-written buffer to reading: `limit = position`,
    /// `position = mark = 0`.
    pub fn flip(&mut self) -> &mut Self {
        self.limit = self.position;
        self.position = 0;
        self.mark = 0;
        self
    }

    /// Replays the valid region from the start; `limit` is untouched.
    pub fn rewind(&mut self) -> &mut Self {
        self.position = 0;
        self.mark = 0;
        self
    }

    /// Moves the unread bytes `[position, limit)` to the start of the
    /// storage, leaving `limit = remaining` and `position = mark = 0`.
    pub fn compact(&mut self) -> &mut Self {
        if self.position == 0 {
            return self;
        }
        self.data.copy_within(self.position..self.limit, 0);
        self.limit -= self.position;
        self.position = 0;
        self.mark = 0;
        self
    }

    /// Fails with [`DyBufError::Underflow`] unless `[index, index + size)`
    /// lies below the limit.
    pub fn check_readable(&self, index: usize, size: usize) -> Result<()> {
        match index.checked_add(size) {
            Some(end) if end <= self.limit => Ok(()),
            _ => Err(DyBufError::Underflow {
                index,
                size,
                limit: self.limit,
            }),
        }
    }

    /// Extends the limit (and capacity) so `[index, index + size)` is
    /// writable.
    pub fn ensure_writable(&mut self, index: usize, size: usize) -> Result<()> {
        let end = index
            .checked_add(size)
            .ok_or(DyBufError::LengthTooLarge(size as u64))?;
        if end > self.limit {
            self.set_limit(end)?;
        }
        Ok(())
    }

    /// The whole backing storage, `capacity` bytes long.
    pub fn storage(&self) -> &[u8] {
        &self.data
    }

    pub fn storage_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The valid region `[0, limit)`.
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.limit]
    }

    /// Consumes the cursor, returning the valid region.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.truncate(self.limit);
        self.data
    }

    /// Moves the position forward by `size` bytes.
    ///
    /// Callers check bounds through the backend first.
    #[inline]
    pub(crate) fn advance(&mut self, size: usize) {
        self.position += size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cursor_is_empty() {
        let c = Cursor::with_capacity(16);
        assert_eq!(c.capacity(), 16);
        assert_eq!(c.limit(), 0);
        assert_eq!(c.position(), 0);
        assert_eq!(c.mark_position(), 0);
        assert!(!c.has_remaining());
    }

    #[test]
    fn wrapped_cursor_is_fully_valid() {
        let c = Cursor::from_vec(vec![1, 2, 3]);
        assert_eq!(c.capacity(), 3);
        assert_eq!(c.limit(), 3);
        assert_eq!(c.remaining(), 3);
    }

    #[test]
    fn size_classes() {
        assert_eq!(size_class(0), Some(0));
        assert_eq!(size_class(64), Some(64));
        assert_eq!(size_class(65), Some(128));
        assert_eq!(size_class(1023), Some(1024));
        assert_eq!(size_class(1024), Some(1024));
        assert_eq!(size_class(1100), Some(1152));
        assert_eq!(size_class(MEDIUM_THRESHOLD), Some(MEDIUM_THRESHOLD));
        assert_eq!(size_class(MEDIUM_THRESHOLD + 1), Some(MEDIUM_THRESHOLD + 1024));
        assert_eq!(size_class(usize::MAX - 1), None);
    }

    #[test]
    fn set_position_past_limit_fails() {
        let mut c = Cursor::from_vec(vec![0; 4]);
        assert_eq!(
            c.set_position(5),
            Err(DyBufError::PositionOutOfRange {
                position: 5,
                limit: 4
            })
        );
        assert!(c.set_position(4).is_ok());
        assert_eq!(c.position(), 4);
    }

    #[test]
    fn set_position_below_mark_clamps_to_mark() {
        let mut c = Cursor::from_vec(vec![0; 8]);
        c.set_position(5).unwrap();
        c.mark();
        c.set_position(2).unwrap();
        assert_eq!(c.position(), 5);
        assert_eq!(c.mark_position(), 5);
    }

    #[test]
    fn set_limit_grows_and_clamps() {
        let mut c = Cursor::from_vec(vec![0; 8]);
        c.set_position(6).unwrap();
        c.mark();
        c.set_limit(3).unwrap();
        assert_eq!(c.position(), 3);
        assert_eq!(c.mark_position(), 3);

        c.set_limit(100).unwrap();
        assert_eq!(c.limit(), 100);
        assert_eq!(c.capacity(), 128);
    }

    #[test]
    fn set_capacity_preserves_bytes() {
        let mut c = Cursor::from_vec(vec![1, 2, 3]);
        c.set_capacity(10).unwrap();
        assert_eq!(c.capacity(), 64);
        assert_eq!(&c.storage()[..3], &[1, 2, 3]);
        assert_eq!(c.limit(), 3);

        let before = c.capacity();
        c.set_capacity(before).unwrap();
        assert_eq!(c.capacity(), before);
    }

    #[test]
    fn set_capacity_shrink_clamps_indices() {
        let mut c = Cursor::with_capacity(256);
        for (i, b) in c.storage_mut().iter_mut().enumerate() {
            *b = i as u8;
        }
        c.set_limit(200).unwrap();
        c.set_position(140).unwrap();
        c.mark();
        c.set_position(150).unwrap();

        c.set_capacity(70).unwrap();
        assert_eq!(c.capacity(), 128);
        assert_eq!(c.limit(), 128);
        assert_eq!(c.position(), 128);
        assert_eq!(c.mark_position(), 128);
        assert_eq!(c.as_slice(), &(0..128).map(|i| i as u8).collect::<Vec<_>>()[..]);

        c.set_capacity(10).unwrap();
        assert_eq!(c.capacity(), 64);
        assert_eq!((c.limit(), c.position(), c.mark_position()), (64, 64, 64));
        assert_eq!(c.as_slice()[63], 63);
    }

    #[test]
    fn oversized_growth_is_an_error() {
        let mut c = Cursor::from_vec(vec![1, 2, 3]);
        assert_eq!(
            c.set_capacity(usize::MAX),
            Err(DyBufError::LengthTooLarge(usize::MAX as u64))
        );
        assert!(c.set_limit(usize::MAX - 1).is_err());
        assert!(c.ensure_writable(usize::MAX - 1, 1).is_err());
        assert!(c.ensure_writable(usize::MAX, 1).is_err());
        assert_eq!(c.capacity(), 3);
        assert_eq!(c.limit(), 3);
        assert_eq!(c.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn clear_flip_rewind() {
        let mut c = Cursor::with_capacity(16);
        c.set_limit(10).unwrap();
        c.set_position(7).unwrap();
        c.mark();
        c.flip();
        assert_eq!((c.position(), c.limit(), c.mark_position()), (0, 7, 0));

        c.set_position(4).unwrap();
        c.rewind();
        assert_eq!((c.position(), c.limit()), (0, 7));

        c.clear();
        assert_eq!((c.position(), c.limit(), c.mark_position()), (0, 16, 0));
    }

    #[test]
    fn mark_and_reset() {
        let mut c = Cursor::from_vec(vec![0; 8]);
        c.set_position(3).unwrap();
        c.mark();
        c.set_position(6).unwrap();
        c.reset();
        assert_eq!(c.position(), 3);
    }

    #[test]
    fn compact_moves_unread_region_to_front() {
        let mut c = Cursor::with_capacity(16);
        c.storage_mut()[..8].copy_from_slice(&[10, 11, 12, 13, 14, 15, 16, 17]);
        c.set_limit(6).unwrap();
        c.set_position(2).unwrap();
        c.mark();
        c.compact();
        assert_eq!(c.position(), 0);
        assert_eq!(c.mark_position(), 0);
        assert_eq!(c.limit(), 4);
        assert_eq!(c.capacity(), 16);
        assert_eq!(c.as_slice(), &[12, 13, 14, 15]);
    }

    #[test]
    fn compact_at_zero_is_noop() {
        let mut c = Cursor::from_vec(vec![1, 2, 3]);
        c.compact();
        assert_eq!(c.as_slice(), &[1, 2, 3]);
        assert_eq!(c.limit(), 3);
    }

    #[test]
    fn check_readable_bounds() {
        let c = Cursor::from_vec(vec![0; 4]);
        assert!(c.check_readable(0, 4).is_ok());
        assert!(c.check_readable(2, 2).is_ok());
        assert_eq!(
            c.check_readable(3, 2),
            Err(DyBufError::Underflow {
                index: 3,
                size: 2,
                limit: 4
            })
        );
        assert!(c.check_readable(usize::MAX, 2).is_err());
    }

    #[test]
    fn ensure_writable_extends_limit() {
        let mut c = Cursor::with_capacity(0);
        c.ensure_writable(0, 3).unwrap();
        assert_eq!(c.limit(), 3);
        assert_eq!(c.capacity(), 64);
        c.ensure_writable(1, 1).unwrap();
        assert_eq!(c.limit(), 3);
        assert!(c.ensure_writable(usize::MAX, 1).is_err());
    }

    #[test]
    fn into_vec_returns_valid_region() {
        let mut c = Cursor::with_capacity(8);
        c.ensure_writable(0, 2).unwrap();
        c.storage_mut()[..2].copy_from_slice(&[7, 9]);
        assert_eq!(c.into_vec(), vec![7, 9]);
    }
}
