//! Error type for buffer and codec operations.

use thiserror::Error;

/// Error type for [`DyBuf`](crate::DyBuf) operations.
///
/// Every variant is raised at the point of detection, before the buffer is
/// mutated where that is possible.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DyBufError {
    /// A read asked for more bytes than are available before `limit`.
    #[error("buffer underflow: index {index} + size {size} exceeds limit {limit}")]
    Underflow {
        index: usize,
        size: usize,
        limit: usize,
    },
    /// A write landed past `limit` after the backend's write hook ran.
    #[error("buffer overflow: index {index} + size {size} exceeds limit {limit}")]
    Overflow {
        index: usize,
        size: usize,
        limit: usize,
    },
    #[error("new position {position} is larger than limit {limit}")]
    PositionOutOfRange { position: usize, limit: usize },
    /// Fixed-width integer length outside `1..=8`.
    #[error("incorrect length {0} for a fixed-width integer, expected 1..=8")]
    InvalidLength(usize),
    /// Payload does not fit the chosen one- or two-byte length prefix.
    #[error("payload length {length} exceeds prefix maximum {max}")]
    PrefixOverflow { length: usize, max: usize },
    #[error("typdex type/index out of supported range (type={ty}, index={index})")]
    TypdexOutOfRange { ty: u32, index: u32 },
    #[error("malformed typdex header: {0:#04x}")]
    MalformedTypdex(u8),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    /// A varint length prefix that cannot address memory on this platform.
    #[error("length {0} is too large")]
    LengthTooLarge(u64),
    #[error("unknown packet field type {0}")]
    UnknownFieldType(u32),
    /// The backend cannot perform the requested operation.
    #[error("operation not supported by backend: {0}")]
    Unsupported(&'static str),
}

/// Result alias used throughout the crate.
pub type Result<T, E = DyBufError> = std::result::Result<T, E>;
