//! One-byte checksum and XOR scrambling over the whole buffer.
//!
//! These need every byte in memory, so each starts with
//! [`Backend::check_full_data_algorithm_support`].

use crate::{Backend, DyBuf, Result};

/// Running-XOR scrambles; see [`DyBuf::apply_xor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum XorMode {
    /// Seed `0xFF`, every byte from the end.
    #[default]
    Chain,
    /// Seed `0x5A`, every byte from the end.
    Salted,
    /// Seed `0x5A`, three interleaved passes sharing one chain: indices
    /// `n-1, n-4, ...`, then `n-2, n-5, ...`, then `n-3, n-6, ...`.
    Salted3,
}

impl XorMode {
    fn seed(self) -> u8 {
        match self {
            Self::Chain => 0xff,
            Self::Salted | Self::Salted3 => 0x5a,
        }
    }

    /// Indices of `[0, n)` in the order the chain visits them.
    fn walk(self, n: usize) -> impl Iterator<Item = usize> {
        let stride = if self == Self::Salted3 { 3 } else { 1 };
        (1..=stride).flat_map(move |lane| (lane..=n).step_by(stride).map(move |k| n - k))
    }
}

fn crc(bytes: &[u8]) -> u8 {
    bytes.iter().enumerate().fold(0u8, |crc, (i, &b)| {
        let crc = if i & 0x0f == 0 { !crc } else { crc };
        crc ^ b
    })
}

impl<B: Backend> DyBuf<B> {
    /// Appends a checksum of `[0, position)`.
    pub fn put_crc_byte(&mut self) -> Result<&mut Self> {
        self.backend.check_full_data_algorithm_support()?;
        let crc = crc(&self.cursor.storage()[..self.cursor.position()]);
        self.put_byte(crc)
    }

    /// Verifies and strips the trailing checksum byte of `[0, limit)`.
    ///
    /// Returns `false`, leaving the limit alone, when the buffer is empty
    /// or the checksum does not match.
    pub fn truncate_crc_byte(&mut self) -> Result<bool> {
        self.backend.check_full_data_algorithm_support()?;
        let limit = self.cursor.limit();
        let Some(body) = limit.checked_sub(1) else {
            return Ok(false);
        };
        let data = self.cursor.storage();
        let (expected, actual) = (crc(&data[..body]), data[body]);
        if expected != actual {
            log::debug!("checksum mismatch: computed {expected:#04x}, stored {actual:#04x}");
            return Ok(false);
        }
        self.cursor.set_limit(body)?;
        Ok(true)
    }

    /// Scrambles `[0, position)` in place.
    pub fn apply_xor(&mut self, mode: XorMode) -> Result<&mut Self> {
        self.backend.check_full_data_algorithm_support()?;
        let n = self.cursor.position();
        let data = self.cursor.storage_mut();
        let mut chain = mode.seed();
        for i in mode.walk(n) {
            chain ^= data[i];
            data[i] = chain;
        }
        Ok(self)
    }

    /// Reverses [`apply_xor`](Self::apply_xor) over `[0, limit)`, so it is
    /// called on the reading side after `flip`.
    pub fn unapply_xor(&mut self, mode: XorMode) -> Result<&mut Self> {
        self.backend.check_full_data_algorithm_support()?;
        let n = self.cursor.limit();
        let data = self.cursor.storage_mut();
        let mut chain = mode.seed();
        for i in mode.walk(n) {
            let scrambled = data[i];
            data[i] ^= chain;
            chain = scrambled;
        }
        Ok(self)
    }
}
