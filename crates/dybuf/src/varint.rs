//! Tiered variable-length integers.
//!
//! An unsigned value takes 1 to 9 bytes. The number of leading one bits in
//! the first byte selects the tier `k`:
//!
//! | tier | bytes | first byte  | payload bits |
//! |------|-------|-------------|--------------|
//! | 0    | 1     | `0xxxxxxx`  | 7            |
//! | 1    | 2     | `10xxxxxx`  | 14           |
//! | 2    | 3     | `110xxxxx`  | 21           |
//! | ...  |       |             |              |
//! | 7    | 8     | `11111110`  | 56           |
//! | 8    | 9     | `11111111`  | 64           |
//!
//! The decoded value is `payload + VARINT_BIAS[k]` (wrapping), so each value
//! has exactly one encoding and the tiers cover `0..=u64::MAX` without
//! gaps. Signed values go through a zigzag transform first.

use crate::{Backend, DyBuf, Endian, Result};

/// Maximum number of bytes a single encoded varint occupies.
pub const VARINT_MAX_LEN: usize = 9;

/// Value added to the raw payload of each tier.
pub const VARINT_BIAS: [u64; VARINT_MAX_LEN] = [
    0,
    0x80,
    0x4080,
    0x20_4080,
    0x1020_4080,
    0x08_1020_4080,
    0x0408_1020_4080,
    0x02_0408_1020_4080,
    0x0102_0408_1020_4080,
];

/// Mask of the payload bits carried by tiers 0..=7.
const TIER_PAYLOAD_MASK: [u64; 8] = [
    0x7f,
    0x3fff,
    0x1f_ffff,
    0x0fff_ffff,
    0x07_ffff_ffff,
    0x03ff_ffff_ffff,
    0x01_ffff_ffff_ffff,
    0x00ff_ffff_ffff_ffff,
];

/// Header bits OR-ed onto the payload of tiers 0..=7, aligned to the
/// tier's byte length.
const TIER_PREFIX: [u64; 8] = [
    0x0,
    0x8000,
    0xc0_0000,
    0xe000_0000,
    0xf0_0000_0000,
    0xf800_0000_0000,
    0xfc_0000_0000_0000,
    0xfe00_0000_0000_0000,
];

const ESCAPE: u8 = 0xff;

/// Returns the tier that encodes `value`.
fn tier_of(value: u64) -> usize {
    (0..8)
        .find(|&k| value >= VARINT_BIAS[k] && value - VARINT_BIAS[k] <= TIER_PAYLOAD_MASK[k])
        .unwrap_or(8)
}

/// Number of bytes [`DyBuf::put_var_u64`] emits for `value`.
///
/// ```
/// use dybuf::var_u64_len;
///
/// assert_eq!(var_u64_len(0x7f), 1);
/// assert_eq!(var_u64_len(0x80), 2);
/// assert_eq!(var_u64_len(u64::MAX), 9);
/// ```
pub fn var_u64_len(value: u64) -> usize {
    tier_of(value) + 1
}

/// Number of bytes [`DyBuf::put_var_i64`] emits for `value`.
pub fn var_i64_len(value: i64) -> usize {
    var_u64_len(zigzag_encode(value))
}

/// Maps signed values onto unsigned ones so small magnitudes stay small:
/// `0, -1, 1, -2, ...` become `0, 1, 2, 3, ...`.
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverts [`zigzag_encode`].
pub fn zigzag_decode(value: u64) -> i64 {
    (value >> 1) as i64 ^ -((value & 1) as i64)
}

/// Byte length of a varint, from its first byte.
pub fn var_len_from_header(header: u8) -> usize {
    header.leading_ones() as usize + 1
}

impl<B: Backend> DyBuf<B> {
    /// Reads an unsigned varint.
    pub fn get_var_u64(&mut self) -> Result<u64> {
        let header = self.get_byte()?;
        let k = header.leading_ones() as usize;
        if header == ESCAPE {
            let raw = self.get_ulong(8, Endian::Big)?;
            return Ok(raw.wrapping_add(VARINT_BIAS[8]));
        }
        let mut payload = (header & (0x7f >> k)) as u64;
        if k > 0 {
            payload = (payload << (8 * k)) | self.get_ulong(k, Endian::Big)?;
        }
        Ok(payload.wrapping_add(VARINT_BIAS[k]))
    }

    /// Writes `value` in the shortest tier that holds it.
    pub fn put_var_u64(&mut self, value: u64) -> Result<&mut Self> {
        let k = tier_of(value);
        if k == 8 {
            self.put_byte(ESCAPE)?;
            return self.put_ulong(value - VARINT_BIAS[8], 8, Endian::Big);
        }
        let word = TIER_PREFIX[k] | (value - VARINT_BIAS[k]);
        self.put_ulong(word, k + 1, Endian::Big)
    }

    /// Reads a zigzag-encoded signed varint.
    pub fn get_var_i64(&mut self) -> Result<i64> {
        Ok(zigzag_decode(self.get_var_u64()?))
    }

    pub fn put_var_i64(&mut self, value: i64) -> Result<&mut Self> {
        self.put_var_u64(zigzag_encode(value))
    }

    /// Reads the raw bytes of the next unsigned varint without decoding.
    pub fn get_var_u64_bytes(&mut self) -> Result<Vec<u8>> {
        let length = var_len_from_header(self.peek_byte()?);
        Ok(self.take(length)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DyBufError;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = DyBuf::with_capacity(16);
        buf.put_var_u64(value).unwrap();
        buf.into_vec()
    }

    fn decode(bytes: &[u8]) -> u64 {
        let mut buf = DyBuf::from_slice(bytes);
        let value = buf.get_var_u64().unwrap();
        assert!(!buf.has_remaining(), "trailing bytes after {bytes:02x?}");
        value
    }

    #[test]
    fn concrete_encodings() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(0x7f), vec![0x7f]);
        assert_eq!(encode(0x80), vec![0x80, 0x00]);
        assert_eq!(encode(0x4080), vec![0xc0, 0x00, 0x00]);
        assert_eq!(encode(0x407f), vec![0xbf, 0xff]);

        let max = encode(u64::MAX);
        assert_eq!(max.len(), 9);
        assert_eq!(max[0], 0xff);
        assert_eq!(&max[1..], &(u64::MAX - VARINT_BIAS[8]).to_be_bytes());
    }

    #[test]
    fn tier_boundaries_are_exact() {
        for k in 1..VARINT_MAX_LEN {
            let below = encode(VARINT_BIAS[k] - 1);
            let at = encode(VARINT_BIAS[k]);
            assert_eq!(below.len(), k, "bias({k}) - 1");
            assert_eq!(at.len(), k + 1, "bias({k})");
            assert_eq!(decode(&below), VARINT_BIAS[k] - 1);
            assert_eq!(decode(&at), VARINT_BIAS[k]);
        }
    }

    #[test]
    fn tier_minimum_has_zero_payload() {
        for k in 1..8 {
            let at = encode(VARINT_BIAS[k]);
            assert_eq!(at[0], (0xff00u16 >> k) as u8);
            assert!(at[1..].iter().all(|&b| b == 0));
        }
        assert_eq!(encode(VARINT_BIAS[7]), vec![0xfe, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn tier_eight_wraps_on_decode() {
        let bytes = [0xff; 9];
        assert_eq!(decode(&bytes), u64::MAX.wrapping_add(VARINT_BIAS[8]));
    }

    #[test]
    fn predicted_lengths_match_encoder() {
        for value in [0, 1, 0x7f, 0x80, 0x407f, 0x4080, 1 << 40, u64::MAX] {
            assert_eq!(var_u64_len(value), encode(value).len());
        }
        assert_eq!(var_i64_len(-1), 1);
        assert_eq!(var_i64_len(i64::MIN), 9);
    }

    #[test]
    fn zigzag_mapping() {
        assert_eq!(zigzag_encode(0), 0);
        assert_eq!(zigzag_encode(-1), 1);
        assert_eq!(zigzag_encode(1), 2);
        assert_eq!(zigzag_encode(-2), 3);
        assert_eq!(zigzag_encode(i64::MAX), u64::MAX - 1);
        assert_eq!(zigzag_encode(i64::MIN), u64::MAX);
        for v in [0, 1, -1, 63, -64, i64::MAX, i64::MIN] {
            assert_eq!(zigzag_decode(zigzag_encode(v)), v);
        }
    }

    #[test]
    fn signed_round_trip() {
        let values = [0, 1, -1, 64, -65, 1_234_567_890_123_456_789, i64::MAX, i64::MIN];
        let mut buf = DyBuf::with_capacity(0);
        for v in values {
            buf.put_var_i64(v).unwrap();
        }
        buf.flip();
        for v in values {
            assert_eq!(buf.get_var_i64().unwrap(), v);
        }
        assert!(!buf.has_remaining());
    }

    #[test]
    fn truncated_varint_underflows() {
        let mut buf = DyBuf::from_slice(&[0xc0, 0x00]);
        assert!(matches!(
            buf.get_var_u64(),
            Err(DyBufError::Underflow { .. })
        ));
        let mut buf = DyBuf::from_slice(&[]);
        assert!(buf.get_var_u64().is_err());
    }

    #[test]
    fn raw_varint_bytes() {
        let mut buf = DyBuf::with_capacity(0);
        buf.put_var_u64(0x4080).unwrap();
        buf.put_var_u64(5).unwrap();
        buf.flip();
        assert_eq!(buf.get_var_u64_bytes().unwrap(), vec![0xc0, 0, 0]);
        assert_eq!(buf.get_var_u64_bytes().unwrap(), vec![5]);
        assert!(buf.get_var_u64_bytes().is_err());
    }
}
