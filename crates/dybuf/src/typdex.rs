//! Typdex: a `(type, index)` pair packed into 1 to 4 bytes.
//!
//! | tier | bytes | layout                                  | type max | index max |
//! |------|-------|-----------------------------------------|----------|-----------|
//! | 0    | 1     | `0ttttiii`                              | `0x0F`   | `0x07`    |
//! | 1    | 2     | `10tttttt iiiiiiii`                     | `0x3F`   | `0xFF`    |
//! | 2    | 3     | `110ttttt ttt iiiii iiiiiiii`           | `0xFF`   | `0x1FFF`  |
//! | 3    | 4     | `1110tttt tttt iiii iiiiiiii iiiiiiii`  | `0xFF`   | `0xFFFFF` |
//!
//! Unlike the integer varint there is no bias; a pair may fit several
//! tiers and the encoder picks the smallest.

use crate::{Backend, DyBuf, DyBufError, Endian, Result};

/// A decoded typdex pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Typdex {
    pub ty: u32,
    pub index: u32,
}

impl Typdex {
    pub fn new(ty: u32, index: u32) -> Self {
        Self { ty, index }
    }

    /// Bytes the encoder emits for this pair, or `None` when it fits no
    /// tier.
    pub fn encoded_len(&self) -> Option<usize> {
        match (self.ty, self.index) {
            (0..=0x0F, 0..=0x07) => Some(1),
            (0..=0x3F, 0..=0xFF) => Some(2),
            (0..=0xFF, 0..=0x1FFF) => Some(3),
            (0..=0xFF, 0..=0x0F_FFFF) => Some(4),
            _ => None,
        }
    }
}

impl<B: Backend> DyBuf<B> {
    /// Writes `(ty, index)` in the smallest tier that fits both.
    pub fn put_typdex(&mut self, ty: u32, index: u32) -> Result<&mut Self> {
        match Typdex::new(ty, index).encoded_len() {
            Some(1) => self.put_byte(((ty << 3) | index) as u8),
            Some(2) => self.put_u16((0x8000 | (ty << 8) | index) as u16, Endian::Big),
            Some(3) => self.put_u24(0xC0_0000 | (ty << 13) | index, Endian::Big),
            Some(_) => self.put_u32(0xE000_0000 | (ty << 20) | index, Endian::Big),
            None => Err(DyBufError::TypdexOutOfRange { ty, index }),
        }
    }

    /// Reads a typdex pair.
    ///
    /// A header with four or more leading one bits fails with
    /// [`DyBufError::MalformedTypdex`] and the position is left unchanged.
    pub fn get_typdex(&mut self) -> Result<Typdex> {
        let header = self.peek_byte()?;
        let typdex = match header.leading_ones() {
            0 => {
                let v = self.get_byte()? as u32;
                Typdex::new((v >> 3) & 0x0F, v & 0x07)
            }
            1 => {
                let v = self.get_u16(Endian::Big)? as u32;
                Typdex::new((v >> 8) & 0x3F, v & 0xFF)
            }
            2 => {
                let v = self.get_u24(Endian::Big)?;
                Typdex::new((v >> 13) & 0xFF, v & 0x1FFF)
            }
            3 => {
                let v = self.get_u32(Endian::Big)?;
                Typdex::new((v >> 20) & 0xFF, v & 0x0F_FFFF)
            }
            _ => {
                log::debug!("malformed typdex header {header:#04x} at {}", self.position());
                return Err(DyBufError::MalformedTypdex(header));
            }
        };
        Ok(typdex)
    }

    /// Reads a typdex pair without advancing.
    pub fn peek_typdex(&mut self) -> Result<Typdex> {
        let position = self.position();
        let typdex = self.get_typdex()?;
        self.cursor.set_position(position)?;
        Ok(typdex)
    }
}
