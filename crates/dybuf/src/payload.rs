//! Length-prefixed byte and string payloads.
//!
//! | variant        | prefix                  |
//! |----------------|-------------------------|
//! | fixed length   | none, caller knows `n`  |
//! | one byte       | `u8` length             |
//! | two byte       | big-endian `u16` length |
//! | var length     | unsigned varint length  |
//! | last           | none, runs to `limit`   |
//!
//! Strings are the byte variants with UTF-8 at the boundary. The C-string
//! variant stores a trailing NUL inside the var-length payload.

use crate::{Backend, DyBuf, DyBufError, Endian, Result};

fn utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| DyBufError::InvalidUtf8)
}

fn check_prefix(length: usize, max: usize) -> Result<()> {
    if length > max {
        return Err(DyBufError::PrefixOverflow { length, max });
    }
    Ok(())
}

impl<B: Backend> DyBuf<B> {
    // ------------------------------------------------------------------ bytes

    /// Reads everything from the position to the limit.
    ///
    /// Returns `None` when nothing remains.
    pub fn get_last_bytes(&mut self) -> Result<Option<Vec<u8>>> {
        self.backend.prepare_all_for_read(&mut self.cursor)?;
        let remaining = self.remaining();
        if remaining == 0 {
            return Ok(None);
        }
        Ok(Some(self.take(remaining)?.to_vec()))
    }

    pub fn get_bytes_with_fixed_length(&mut self, length: usize) -> Result<Vec<u8>> {
        Ok(self.take(length)?.to_vec())
    }

    pub fn get_bytes_with_one_byte_length(&mut self) -> Result<Vec<u8>> {
        let length = self.get_byte()? as usize;
        self.get_bytes_with_fixed_length(length)
    }

    pub fn get_bytes_with_two_byte_length(&mut self) -> Result<Vec<u8>> {
        let length = self.get_u16(Endian::Big)? as usize;
        self.get_bytes_with_fixed_length(length)
    }

    pub fn get_bytes_with_var_length(&mut self) -> Result<Vec<u8>> {
        let length = self.get_var_u64()?;
        let length = usize::try_from(length).map_err(|_| DyBufError::LengthTooLarge(length))?;
        self.get_bytes_with_fixed_length(length)
    }

    /// Writes `bytes` with no length prefix.
    pub fn put_last_bytes(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(self)
    }

    /// Writes `bytes` with no prefix; the reader must pass the same length
    /// to [`get_bytes_with_fixed_length`](Self::get_bytes_with_fixed_length).
    pub fn put_bytes_with_fixed_length(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.put_last_bytes(bytes)
    }

    /// Fails with [`DyBufError::PrefixOverflow`] for more than 255 bytes.
    pub fn put_bytes_with_one_byte_length(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        check_prefix(bytes.len(), u8::MAX as usize)?;
        self.put_byte(bytes.len() as u8)?;
        self.put_last_bytes(bytes)
    }

    /// Fails with [`DyBufError::PrefixOverflow`] for more than 65535 bytes.
    pub fn put_bytes_with_two_byte_length(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        check_prefix(bytes.len(), u16::MAX as usize)?;
        self.put_u16(bytes.len() as u16, Endian::Big)?;
        self.put_last_bytes(bytes)
    }

    /// An empty payload encodes as the single byte `0x00`.
    pub fn put_bytes_with_var_length(&mut self, bytes: &[u8]) -> Result<&mut Self> {
        self.put_var_u64(bytes.len() as u64)?;
        self.put_last_bytes(bytes)
    }

    // ---------------------------------------------------------------- strings

    pub fn get_last_string(&mut self) -> Result<Option<String>> {
        self.get_last_bytes()?.map(utf8).transpose()
    }

    pub fn get_string_with_fixed_length(&mut self, length: usize) -> Result<String> {
        utf8(self.get_bytes_with_fixed_length(length)?)
    }

    pub fn get_string_with_one_byte_length(&mut self) -> Result<String> {
        utf8(self.get_bytes_with_one_byte_length()?)
    }

    pub fn get_string_with_two_byte_length(&mut self) -> Result<String> {
        utf8(self.get_bytes_with_two_byte_length()?)
    }

    pub fn get_var_string(&mut self) -> Result<String> {
        utf8(self.get_bytes_with_var_length()?)
    }

    /// Reads a var-length string, dropping one trailing NUL if present.
    pub fn get_cstring_with_var_length(&mut self) -> Result<String> {
        let mut bytes = self.get_bytes_with_var_length()?;
        if bytes.last() == Some(&0) {
            bytes.pop();
        }
        utf8(bytes)
    }

    pub fn put_last_string(&mut self, s: &str) -> Result<&mut Self> {
        self.put_last_bytes(s.as_bytes())
    }

    pub fn put_string_with_fixed_length(&mut self, s: &str) -> Result<&mut Self> {
        self.put_bytes_with_fixed_length(s.as_bytes())
    }

    pub fn put_string_with_one_byte_length(&mut self, s: &str) -> Result<&mut Self> {
        self.put_bytes_with_one_byte_length(s.as_bytes())
    }

    pub fn put_string_with_two_byte_length(&mut self, s: &str) -> Result<&mut Self> {
        self.put_bytes_with_two_byte_length(s.as_bytes())
    }

    pub fn put_var_string(&mut self, s: &str) -> Result<&mut Self> {
        self.put_bytes_with_var_length(s.as_bytes())
    }

    /// Writes `s` plus a trailing NUL as one var-length payload.
    pub fn put_cstring_with_var_length(&mut self, s: &str) -> Result<&mut Self> {
        self.put_var_u64(s.len() as u64 + 1)?;
        self.put_last_bytes(s.as_bytes())?;
        self.put_byte(0)
    }
}
