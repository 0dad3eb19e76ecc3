//! Fixed-width accessors: byte, bool, 16/24/32-bit and 1..=8 byte integers.
//!
//! Each width has `get_*` (advances), `peek_*` (does not advance),
//! `get_*_at` (absolute index), `put_*` and `put_*_at`. Multi-byte forms
//! take an [`Endian`].

use crate::{Backend, DyBuf, DyBufError, Result};

/// Byte order for multi-byte fixed-width fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

fn check_long_length(length: usize) -> Result<()> {
    if length == 0 || length > 8 {
        return Err(DyBufError::InvalidLength(length));
    }
    Ok(())
}

fn compose_u24(bytes: &[u8], endian: Endian) -> u32 {
    match endian {
        Endian::Big => (u16::from_be_bytes([bytes[0], bytes[1]]) as u32) << 8 | bytes[2] as u32,
        Endian::Little => (bytes[2] as u32) << 16 | u16::from_le_bytes([bytes[0], bytes[1]]) as u32,
    }
}

fn split_u24(value: u32, out: &mut [u8], endian: Endian) {
    match endian {
        Endian::Big => {
            out[..2].copy_from_slice(&((value >> 8) as u16).to_be_bytes());
            out[2] = value as u8;
        }
        Endian::Little => {
            out[..2].copy_from_slice(&(value as u16).to_le_bytes());
            out[2] = (value >> 16) as u8;
        }
    }
}

fn compose_ulong(bytes: &[u8], endian: Endian) -> u64 {
    let fold = |acc: u64, b: &u8| (acc << 8) | *b as u64;
    match endian {
        Endian::Big => bytes.iter().fold(0, fold),
        Endian::Little => bytes.iter().rev().fold(0, fold),
    }
}

fn split_ulong(value: u64, out: &mut [u8], endian: Endian) {
    let length = out.len();
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = match endian {
            Endian::Big => (length - 1 - i) * 8,
            Endian::Little => i * 8,
        };
        *slot = (value >> shift) as u8;
    }
}

impl<B: Backend> DyBuf<B> {
    // ------------------------------------------------------------------- byte

    /// Reads one byte and advances.
    pub fn get_byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Reads one byte without advancing.
    pub fn peek_byte(&mut self) -> Result<u8> {
        Ok(self.look(1)?[0])
    }

    /// Reads the byte at `index`; the position does not move.
    pub fn get_byte_at(&mut self, index: usize) -> Result<u8> {
        Ok(self.look_at(index, 1)?[0])
    }

    /// Writes one byte and advances, growing the buffer if needed.
    pub fn put_byte(&mut self, value: u8) -> Result<&mut Self> {
        self.reserve(1)?[0] = value;
        Ok(self)
    }

    /// Writes `value` at `index` without moving the position.
    pub fn put_byte_at(&mut self, index: usize, value: u8) -> Result<&mut Self> {
        self.reserve_at(index, 1)?[0] = value;
        Ok(self)
    }

    // ------------------------------------------------------------------- bool

    /// Reads one byte; any non-zero value is `true`.
    pub fn get_bool(&mut self) -> Result<bool> {
        Ok(self.get_byte()? != 0)
    }

    /// Like [`get_bool`](Self::get_bool), without advancing.
    pub fn peek_bool(&mut self) -> Result<bool> {
        Ok(self.peek_byte()? != 0)
    }

    /// Reads the flag at `index`.
    pub fn get_bool_at(&mut self, index: usize) -> Result<bool> {
        Ok(self.get_byte_at(index)? != 0)
    }

    /// Writes `1` or `0`.
    pub fn put_bool(&mut self, value: bool) -> Result<&mut Self> {
        self.put_byte(value as u8)
    }

    /// Writes `1` or `0` at `index`.
    pub fn put_bool_at(&mut self, index: usize, value: bool) -> Result<&mut Self> {
        self.put_byte_at(index, value as u8)
    }

    // ------------------------------------------------------------------ short

    /// Reads a two-byte signed integer.
    pub fn get_i16(&mut self, endian: Endian) -> Result<i16> {
        Ok(self.get_u16(endian)? as i16)
    }

    /// Reads a two-byte unsigned integer.
    pub fn get_u16(&mut self, endian: Endian) -> Result<u16> {
        let bytes = array(self.take(2)?);
        Ok(match endian {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        })
    }

    /// Reads a two-byte signed integer without advancing.
    pub fn peek_i16(&mut self, endian: Endian) -> Result<i16> {
        Ok(self.peek_u16(endian)? as i16)
    }

    /// Reads a two-byte unsigned integer without advancing.
    pub fn peek_u16(&mut self, endian: Endian) -> Result<u16> {
        let position = self.position();
        self.get_u16_at(position, endian)
    }

    /// Reads a two-byte signed integer at `index`.
    pub fn get_i16_at(&mut self, index: usize, endian: Endian) -> Result<i16> {
        Ok(self.get_u16_at(index, endian)? as i16)
    }

    /// Reads a two-byte unsigned integer at `index`.
    pub fn get_u16_at(&mut self, index: usize, endian: Endian) -> Result<u16> {
        let bytes = array(self.look_at(index, 2)?);
        Ok(match endian {
            Endian::Big => u16::from_be_bytes(bytes),
            Endian::Little => u16::from_le_bytes(bytes),
        })
    }

    /// Writes a two-byte signed integer.
    pub fn put_i16(&mut self, value: i16, endian: Endian) -> Result<&mut Self> {
        self.put_u16(value as u16, endian)
    }

    /// Writes a two-byte unsigned integer.
    pub fn put_u16(&mut self, value: u16, endian: Endian) -> Result<&mut Self> {
        let bytes = match endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        self.reserve(2)?.copy_from_slice(&bytes);
        Ok(self)
    }

    /// Writes a two-byte signed integer at `index`.
    pub fn put_i16_at(&mut self, index: usize, value: i16, endian: Endian) -> Result<&mut Self> {
        self.put_u16_at(index, value as u16, endian)
    }

    /// Writes a two-byte unsigned integer at `index`.
    pub fn put_u16_at(&mut self, index: usize, value: u16, endian: Endian) -> Result<&mut Self> {
        let bytes = match endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        self.reserve_at(index, 2)?.copy_from_slice(&bytes);
        Ok(self)
    }

    // ----------------------------------------------------------------- 24-bit

    /// Reads an unsigned 24-bit integer, composed from a 16-bit and an
    /// 8-bit part.
    pub fn get_u24(&mut self, endian: Endian) -> Result<u32> {
        Ok(compose_u24(self.take(3)?, endian))
    }

    /// Reads a 24-bit integer without advancing.
    pub fn peek_u24(&mut self, endian: Endian) -> Result<u32> {
        Ok(compose_u24(self.look(3)?, endian))
    }

    /// Reads a 24-bit integer at `index`.
    pub fn get_u24_at(&mut self, index: usize, endian: Endian) -> Result<u32> {
        Ok(compose_u24(self.look_at(index, 3)?, endian))
    }

    /// Writes the low 24 bits of `value`.
    pub fn put_u24(&mut self, value: u32, endian: Endian) -> Result<&mut Self> {
        split_u24(value, self.reserve(3)?, endian);
        Ok(self)
    }

    /// Writes the low 24 bits of `value` at `index`.
    pub fn put_u24_at(&mut self, index: usize, value: u32, endian: Endian) -> Result<&mut Self> {
        split_u24(value, self.reserve_at(index, 3)?, endian);
        Ok(self)
    }

    // -------------------------------------------------------------------- int

    /// Reads a four-byte signed integer.
    pub fn get_i32(&mut self, endian: Endian) -> Result<i32> {
        Ok(self.get_u32(endian)? as i32)
    }

    /// Reads a four-byte unsigned integer.
    pub fn get_u32(&mut self, endian: Endian) -> Result<u32> {
        let bytes = array(self.take(4)?);
        Ok(match endian {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        })
    }

    /// Reads a four-byte signed integer without advancing.
    pub fn peek_i32(&mut self, endian: Endian) -> Result<i32> {
        Ok(self.peek_u32(endian)? as i32)
    }

    /// Reads a four-byte unsigned integer without advancing.
    pub fn peek_u32(&mut self, endian: Endian) -> Result<u32> {
        let position = self.position();
        self.get_u32_at(position, endian)
    }

    /// Reads a four-byte signed integer at `index`.
    pub fn get_i32_at(&mut self, index: usize, endian: Endian) -> Result<i32> {
        Ok(self.get_u32_at(index, endian)? as i32)
    }

    /// Reads a four-byte unsigned integer at `index`.
    pub fn get_u32_at(&mut self, index: usize, endian: Endian) -> Result<u32> {
        let bytes = array(self.look_at(index, 4)?);
        Ok(match endian {
            Endian::Big => u32::from_be_bytes(bytes),
            Endian::Little => u32::from_le_bytes(bytes),
        })
    }

    /// Writes a four-byte signed integer.
    pub fn put_i32(&mut self, value: i32, endian: Endian) -> Result<&mut Self> {
        self.put_u32(value as u32, endian)
    }

    /// Writes a four-byte unsigned integer.
    pub fn put_u32(&mut self, value: u32, endian: Endian) -> Result<&mut Self> {
        let bytes = match endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        self.reserve(4)?.copy_from_slice(&bytes);
        Ok(self)
    }

    /// Writes a four-byte signed integer at `index`.
    pub fn put_i32_at(&mut self, index: usize, value: i32, endian: Endian) -> Result<&mut Self> {
        self.put_u32_at(index, value as u32, endian)
    }

    /// Writes a four-byte unsigned integer at `index`.
    pub fn put_u32_at(&mut self, index: usize, value: u32, endian: Endian) -> Result<&mut Self> {
        let bytes = match endian {
            Endian::Big => value.to_be_bytes(),
            Endian::Little => value.to_le_bytes(),
        };
        self.reserve_at(index, 4)?.copy_from_slice(&bytes);
        Ok(self)
    }

    // ------------------------------------------------------------------- long

    /// Reads an unsigned integer stored in `length` (1..=8) bytes.
    pub fn get_ulong(&mut self, length: usize, endian: Endian) -> Result<u64> {
        check_long_length(length)?;
        Ok(compose_ulong(self.take(length)?, endian))
    }

    /// Like [`get_ulong`](Self::get_ulong), without advancing.
    pub fn peek_ulong(&mut self, length: usize, endian: Endian) -> Result<u64> {
        check_long_length(length)?;
        Ok(compose_ulong(self.look(length)?, endian))
    }

    /// Like [`get_ulong`](Self::get_ulong), reading at `index`.
    pub fn get_ulong_at(&mut self, index: usize, length: usize, endian: Endian) -> Result<u64> {
        check_long_length(length)?;
        Ok(compose_ulong(self.look_at(index, length)?, endian))
    }

    /// Writes `value` modulo `2^(8 * length)` in `length` (1..=8) bytes.
    pub fn put_ulong(&mut self, value: u64, length: usize, endian: Endian) -> Result<&mut Self> {
        check_long_length(length)?;
        split_ulong(value, self.reserve(length)?, endian);
        Ok(self)
    }

    /// Like [`put_ulong`](Self::put_ulong), writing at `index`.
    pub fn put_ulong_at(
        &mut self,
        index: usize,
        value: u64,
        length: usize,
        endian: Endian,
    ) -> Result<&mut Self> {
        check_long_length(length)?;
        split_ulong(value, self.reserve_at(index, length)?, endian);
        Ok(self)
    }

    /// Reads eight bytes as `u64`.
    pub fn get_u64(&mut self, endian: Endian) -> Result<u64> {
        self.get_ulong(8, endian)
    }

    /// Reads eight bytes as `i64`.
    pub fn get_i64(&mut self, endian: Endian) -> Result<i64> {
        Ok(self.get_ulong(8, endian)? as i64)
    }

    /// Writes `value` in eight bytes.
    pub fn put_u64(&mut self, value: u64, endian: Endian) -> Result<&mut Self> {
        self.put_ulong(value, 8, endian)
    }

    /// Writes `value` in eight bytes.
    pub fn put_i64(&mut self, value: i64, endian: Endian) -> Result<&mut Self> {
        self.put_ulong(value as u64, 8, endian)
    }
}
