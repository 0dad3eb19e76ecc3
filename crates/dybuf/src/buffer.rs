//! The [`DyBuf`] type: a [`Cursor`] plus the [`Backend`] it checks bounds
//! through.

use std::fmt;

use crate::octets::print_octets;
use crate::{Backend, Cursor, DyBufError, InMemory, Result};

/// A resizable byte buffer with cursor semantics.
///
/// Reads fail with [`DyBufError::Underflow`] past the limit; writes past the
/// limit extend it, growing the storage in size classes.
///
/// # Example
///
/// ```
/// use dybuf::{DyBuf, Endian};
///
/// let mut buf = DyBuf::with_capacity(16);
/// buf.put_u16(0xBEEF, Endian::Big).unwrap();
/// buf.put_var_u64(300).unwrap();
/// buf.flip();
///
/// assert_eq!(buf.get_u16(Endian::Big).unwrap(), 0xBEEF);
/// assert_eq!(buf.get_var_u64().unwrap(), 300);
/// assert!(!buf.has_remaining());
/// ```
pub struct DyBuf<B: Backend = InMemory> {
    pub(crate) cursor: Cursor,
    pub(crate) backend: B,
}

impl DyBuf {
    /// Creates an empty buffer over `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_backend(Cursor::with_capacity(capacity), InMemory)
    }

    /// Takes ownership of `data`; all of it is readable.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::with_backend(Cursor::from_vec(data), InMemory)
    }

    /// Copies `data` into a new buffer; all of it is readable.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::from_vec(data.to_vec())
    }
}

impl Default for DyBuf {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<B: Backend> DyBuf<B> {
    /// Wraps an existing cursor with a custom backend.
    pub fn with_backend(cursor: Cursor, backend: B) -> Self {
        Self { cursor, backend }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the backend mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Returns the underlying cursor.
    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Splits the buffer into its cursor and backend.
    pub fn into_parts(self) -> (Cursor, B) {
        (self.cursor, self.backend)
    }

    // ------------------------------------------------------------------ cursor

    /// Returns the size of the backing storage.
    pub fn capacity(&self) -> usize {
        self.cursor.capacity()
    }

    /// Returns the current read/write offset.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Returns the end of the valid region.
    pub fn limit(&self) -> usize {
        self.cursor.limit()
    }

    /// Returns the remembered mark.
    pub fn mark_position(&self) -> usize {
        self.cursor.mark_position()
    }

    /// Returns `limit - position`.
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Returns whether any bytes are left before the limit.
    pub fn has_remaining(&self) -> bool {
        self.cursor.has_remaining()
    }

    /// See [`Cursor::set_position`]; a target below the mark is clamped up.
    pub fn set_position(&mut self, position: usize) -> Result<&mut Self> {
        self.cursor.set_position(position)?;
        Ok(self)
    }

    /// See [`Cursor::set_limit`]; growing past the capacity reallocates.
    pub fn set_limit(&mut self, limit: usize) -> Result<&mut Self> {
        self.cursor.set_limit(limit)?;
        Ok(self)
    }

    /// See [`Cursor::set_capacity`].
    pub fn set_capacity(&mut self, capacity: usize) -> Result<&mut Self> {
        self.cursor.set_capacity(capacity)?;
        Ok(self)
    }

    /// Remembers the current position.
    pub fn mark(&mut self) -> &mut Self {
        self.cursor.mark();
        self
    }

    /// Returns to the remembered position.
    pub fn reset(&mut self) -> &mut Self {
        self.cursor.reset();
        self
    }

    /// Prepares for writing from scratch.
    pub fn clear(&mut self) -> &mut Self {
        self.cursor.clear();
        self
    }

    /// Switches a just-written buffer to reading.
    pub fn flip(&mut self) -> &mut Self {
        self.cursor.flip();
        self
    }

    /// Replays the valid region from the start.
    pub fn rewind(&mut self) -> &mut Self {
        self.cursor.rewind();
        self
    }

    /// Moves the unread bytes to the start of the storage.
    pub fn compact(&mut self) -> &mut Self {
        self.cursor.compact();
        self
    }

    /// Pushes out writes a non-default backend may be holding.
    pub fn flush(&mut self) -> Result<()> {
        self.backend.flush_all_for_write(&mut self.cursor)
    }

    // ---------------------------------------------------------------- extract

    /// The valid region `[0, limit)`.
    pub fn as_slice(&self) -> &[u8] {
        self.cursor.as_slice()
    }

    /// Consumes the buffer, returning the valid region.
    pub fn into_vec(self) -> Vec<u8> {
        self.cursor.into_vec()
    }

    /// Copies `[mark, position)`: everything written since the last mark.
    pub fn bytes_before_position(&self) -> Vec<u8> {
        self.cursor.storage()[self.cursor.mark_position()..self.cursor.position()].to_vec()
    }

    /// Appends `[mark, position)` to `other` at its position.
    pub fn write_bytes_before_position_to<O: Backend>(&self, other: &mut DyBuf<O>) -> Result<()> {
        let start = self.cursor.mark_position();
        other.put_last_bytes(&self.cursor.storage()[start..self.cursor.position()])?;
        Ok(())
    }

    // ------------------------------------------------------------- primitives

    /// Reads `size` bytes at the position and advances past them.
    pub(crate) fn take(&mut self, size: usize) -> Result<&[u8]> {
        self.backend.prepare_for_read(&mut self.cursor, size)?;
        let start = self.cursor.position();
        self.cursor.check_readable(start, size)?;
        self.cursor.advance(size);
        Ok(&self.cursor.storage()[start..start + size])
    }

    /// Reads `size` bytes at the position without advancing.
    pub(crate) fn look(&mut self, size: usize) -> Result<&[u8]> {
        self.backend.prepare_for_read(&mut self.cursor, size)?;
        let start = self.cursor.position();
        self.cursor.check_readable(start, size)?;
        Ok(&self.cursor.storage()[start..start + size])
    }

    /// Reads `size` bytes at `index`; the position is untouched.
    pub(crate) fn look_at(&mut self, index: usize, size: usize) -> Result<&[u8]> {
        self.backend
            .prepare_for_read_at(&mut self.cursor, index, size)?;
        self.cursor.check_readable(index, size)?;
        Ok(&self.cursor.storage()[index..index + size])
    }

    /// Reserves `size` writable bytes at the position and advances past them.
    pub(crate) fn reserve(&mut self, size: usize) -> Result<&mut [u8]> {
        self.backend.prepare_for_write(&mut self.cursor, size)?;
        let start = self.cursor.position();
        self.writable(start, size)?;
        self.cursor.advance(size);
        Ok(&mut self.cursor.storage_mut()[start..start + size])
    }

    /// Reserves `size` writable bytes at `index`; the position is untouched.
    pub(crate) fn reserve_at(&mut self, index: usize, size: usize) -> Result<&mut [u8]> {
        self.backend
            .prepare_for_write_at(&mut self.cursor, index, size)?;
        self.writable(index, size)?;
        Ok(&mut self.cursor.storage_mut()[index..index + size])
    }

    /// Fails with [`DyBufError::Overflow`] when the backend left
    /// `[index, index + size)` past the limit.
    fn writable(&self, index: usize, size: usize) -> Result<()> {
        self.cursor
            .check_readable(index, size)
            .map_err(|_| DyBufError::Overflow {
                index,
                size,
                limit: self.cursor.limit(),
            })
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("capacity", &self.capacity())
            .field("limit", &self.limit())
            .field("position", &self.position())
            .field("mark", &self.mark_position())
            .field("data", &print_octets(self.as_slice(), 16))
            .finish()
    }
}

impl<B: Backend> fmt::Debug for DyBuf<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DyBuf").field(&self.cursor).finish()
    }
}
