//! Pluggable hooks a [`DyBuf`](crate::DyBuf) routes bounds checks through.
//!
//! The in-memory default fails reads past the limit and grows the storage
//! on writes. A backend that loads bytes lazily overrides the read hooks to
//! fill [`Cursor::storage_mut`] and raise the limit before the check; one
//! that buffers writes overrides [`Backend::flush_all_for_write`].

use crate::{Cursor, Result};

/// Bounds-checking and materialization hooks.
///
/// Every method has the in-memory behaviour as its default, so
/// `impl Backend for MyBackend {}` is a valid backend.
pub trait Backend {
    /// Called before reading `size` bytes at the position.
    fn prepare_for_read(&mut self, cursor: &mut Cursor, size: usize) -> Result<()> {
        cursor.check_readable(cursor.position(), size)
    }

    /// Called before reading `size` bytes at an absolute `index`.
    fn prepare_for_read_at(&mut self, cursor: &mut Cursor, index: usize, size: usize) -> Result<()> {
        cursor.check_readable(index, size)
    }

    /// Called before operations that consume everything up to the limit.
    fn prepare_all_for_read(&mut self, _cursor: &mut Cursor) -> Result<()> {
        Ok(())
    }

    /// Called before writing `size` bytes at the position.
    fn prepare_for_write(&mut self, cursor: &mut Cursor, size: usize) -> Result<()> {
        let position = cursor.position();
        cursor.ensure_writable(position, size)
    }

    /// Called before writing `size` bytes at an absolute `index`.
    fn prepare_for_write_at(&mut self, cursor: &mut Cursor, index: usize, size: usize) -> Result<()> {
        cursor.ensure_writable(index, size)
    }

    /// Pushes out buffered writes. Backends that cannot write leave this
    /// as a no-op rather than failing.
    fn flush_all_for_write(&mut self, _cursor: &mut Cursor) -> Result<()> {
        Ok(())
    }

    /// Rejects algorithms that need the whole data set in memory
    /// (checksums, XOR scrambling).
    fn check_full_data_algorithm_support(&self) -> Result<()> {
        Ok(())
    }
}

/// The default backend: the whole buffer lives in memory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InMemory;

impl Backend for InMemory {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DyBufError;

    #[test]
    fn in_memory_read_checks_limit() {
        let mut cursor = Cursor::from_vec(vec![1, 2]);
        let mut backend = InMemory;
        assert!(backend.prepare_for_read(&mut cursor, 2).is_ok());
        assert_eq!(
            backend.prepare_for_read(&mut cursor, 3),
            Err(DyBufError::Underflow {
                index: 0,
                size: 3,
                limit: 2
            })
        );
        assert!(backend.prepare_for_read_at(&mut cursor, 1, 1).is_ok());
        assert!(backend.prepare_for_read_at(&mut cursor, 2, 1).is_err());
    }

    #[test]
    fn in_memory_write_extends_limit() {
        let mut cursor = Cursor::with_capacity(4);
        let mut backend = InMemory;
        backend.prepare_for_write(&mut cursor, 3).unwrap();
        assert_eq!(cursor.limit(), 3);
        backend.prepare_for_write_at(&mut cursor, 10, 2).unwrap();
        assert_eq!(cursor.limit(), 12);
        assert_eq!(cursor.capacity(), 64);
    }

    #[test]
    fn in_memory_hooks_are_noops() {
        let mut cursor = Cursor::with_capacity(4);
        let mut backend = InMemory;
        assert!(backend.prepare_all_for_read(&mut cursor).is_ok());
        assert!(backend.flush_all_for_write(&mut cursor).is_ok());
        assert!(backend.check_full_data_algorithm_support().is_ok());
        assert_eq!(cursor, Cursor::with_capacity(4));
    }
}
