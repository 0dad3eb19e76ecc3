//! Tagged fields on top of typdex.
//!
//! A field is a typdex header whose `type` names the payload encoding and
//! whose `index` is the caller's field number. `Version` and `Eof` carry no
//! payload; the version number rides in the index.

use crate::{Backend, DyBuf, DyBufError, Result};

/// Payload encodings a field header can name.
///
/// Type numbers 4 and 5 (floating point) and 8 and 9 (containers) are
/// reserved and decode as [`DyBufError::UnknownFieldType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FieldType {
    Eof = 0,
    Bool = 1,
    Int = 2,
    Uint = 3,
    String = 6,
    Bytes = 7,
    Version = 0x0F,
}

impl TryFrom<u32> for FieldType {
    type Error = DyBufError;

    fn try_from(value: u32) -> Result<Self> {
        Ok(match value {
            0 => Self::Eof,
            1 => Self::Bool,
            2 => Self::Int,
            3 => Self::Uint,
            6 => Self::String,
            7 => Self::Bytes,
            0x0F => Self::Version,
            other => return Err(DyBufError::UnknownFieldType(other)),
        })
    }
}

impl From<FieldType> for u32 {
    fn from(ty: FieldType) -> Self {
        ty as u32
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Uint(u64),
    String(String),
    Bytes(Vec<u8>),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Bool(_) => FieldType::Bool,
            Self::Int(_) => FieldType::Int,
            Self::Uint(_) => FieldType::Uint,
            Self::String(_) => FieldType::String,
            Self::Bytes(_) => FieldType::Bytes,
        }
    }
}

/// One decoded field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Version(u32),
    Eof,
    Value { index: u32, value: FieldValue },
}

impl Field {
    pub fn value(index: u32, value: FieldValue) -> Self {
        Self::Value { index, value }
    }
}

impl<B: Backend> DyBuf<B> {
    pub fn put_field(&mut self, field: &Field) -> Result<&mut Self> {
        match field {
            Field::Version(version) => self.put_typdex(FieldType::Version.into(), *version),
            Field::Eof => self.put_typdex(FieldType::Eof.into(), 0),
            Field::Value { index, value } => {
                self.put_typdex(value.field_type().into(), *index)?;
                match value {
                    FieldValue::Bool(v) => self.put_bool(*v),
                    FieldValue::Int(v) => self.put_var_i64(*v),
                    FieldValue::Uint(v) => self.put_var_u64(*v),
                    FieldValue::String(v) => self.put_cstring_with_var_length(v),
                    FieldValue::Bytes(v) => self.put_bytes_with_var_length(v),
                }
            }
        }
    }

    /// Reads the next field header without advancing.
    pub fn peek_field_header(&mut self) -> Result<(FieldType, u32)> {
        let typdex = self.peek_typdex()?;
        Ok((FieldType::try_from(typdex.ty)?, typdex.index))
    }

    /// Reads one field.
    ///
    /// An unknown or reserved type fails before the header is consumed.
    pub fn get_field(&mut self) -> Result<Field> {
        let (ty, index) = self.peek_field_header()?;
        self.get_typdex()?;
        let value = match ty {
            FieldType::Eof => return Ok(Field::Eof),
            FieldType::Version => return Ok(Field::Version(index)),
            FieldType::Bool => FieldValue::Bool(self.get_bool()?),
            FieldType::Int => FieldValue::Int(self.get_var_i64()?),
            FieldType::Uint => FieldValue::Uint(self.get_var_u64()?),
            FieldType::String => FieldValue::String(self.get_cstring_with_var_length()?),
            FieldType::Bytes => FieldValue::Bytes(self.get_bytes_with_var_length()?),
        };
        Ok(Field::Value { index, value })
    }
}
