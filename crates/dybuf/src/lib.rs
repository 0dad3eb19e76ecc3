//! Resizable byte buffer with cursor semantics and compact binary codecs.
//!
//! # Overview
//!
//! - [`DyBuf`] - a growable buffer with `position`, `limit` and `mark`
//! - [`Cursor`] - the storage and indices a [`Backend`] sees
//! - [`Backend`] - hooks for bounds checks; [`InMemory`] is the default
//! - fixed-width integers in either [`Endian`], tiered varints, length
//!   prefixed byte and string payloads, [`Typdex`] headers and tagged
//!   [`Field`]s
//! - one-byte checksums and [`XorMode`] scrambling
//!
//! # Example
//!
//! ```
//! use dybuf::{DyBuf, Endian};
//!
//! // Write some data
//! let mut buf = DyBuf::with_capacity(0);
//! buf.put_byte(0x01).unwrap();
//! buf.put_u16(0x0203, Endian::Big).unwrap();
//! buf.put_var_string("hello").unwrap();
//! buf.put_typdex(3, 0x12).unwrap();
//! buf.flip();
//!
//! // Read it back
//! assert_eq!(buf.get_byte().unwrap(), 0x01);
//! assert_eq!(buf.get_u16(Endian::Big).unwrap(), 0x0203);
//! assert_eq!(buf.get_var_string().unwrap(), "hello");
//! let typdex = buf.get_typdex().unwrap();
//! assert_eq!((typdex.ty, typdex.index), (3, 0x12));
//! ```

mod backend;
mod buffer;
mod checksum;
mod cursor;
mod error;
mod fixed;
mod octets;
mod packet;
mod payload;
mod typdex;
mod varint;

pub use backend::{Backend, InMemory};
pub use buffer::DyBuf;
pub use checksum::XorMode;
pub use cursor::{
    size_class, Cursor, LARGE_GRANULARITY, MEDIUM_GRANULARITY, MEDIUM_THRESHOLD,
    SMALL_GRANULARITY, SMALL_THRESHOLD,
};
pub use error::{DyBufError, Result};
pub use fixed::Endian;
pub use octets::print_octets;
pub use packet::{Field, FieldType, FieldValue};
pub use typdex::Typdex;
pub use varint::{
    var_i64_len, var_len_from_header, var_u64_len, zigzag_decode, zigzag_encode, VARINT_BIAS,
    VARINT_MAX_LEN,
};
