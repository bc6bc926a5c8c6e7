#![forbid(unsafe_code)]
//! Column type tags, row values, and the schema-driven row codec.

use core::fmt;
use core::str::FromStr;

use crate::error::{Result, StreamError};
use crate::primitives::bytes::{F64_LEN, I64_LEN, LEN_PREFIX};

mod marshal;

pub use marshal::validate_schema;

/// Kind of value stored in a schema column.
///
/// The stream itself carries no type information; the caller supplies the tags.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeTag {
    /// One byte, zero is false.
    Bool = 0,
    /// One raw byte. Not encodable through [`crate::Stream::marshal`].
    Byte = 1,
    /// Signed 64-bit integer.
    Int = 2,
    /// IEEE-754 binary64.
    Float = 3,
    /// Length-prefixed UTF-8 text.
    String = 4,
}

impl TypeTag {
    /// All tags in discriminant order.
    pub const ALL: [TypeTag; 5] = [
        TypeTag::Bool,
        TypeTag::Byte,
        TypeTag::Int,
        TypeTag::Float,
        TypeTag::String,
    ];

    /// Numeric discriminant, `Bool` = 0 through `String` = 4.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lower-case name accepted by [`FromStr`].
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Bool => "bool",
            TypeTag::Byte => "byte",
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::String => "string",
        }
    }

    /// Encoded width for fixed-size kinds, `None` for strings.
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            TypeTag::Bool | TypeTag::Byte => Some(1),
            TypeTag::Int => Some(I64_LEN),
            TypeTag::Float => Some(F64_LEN),
            TypeTag::String => None,
        }
    }

    /// Whether the marshal engine can encode columns of this kind.
    pub const fn is_marshalable(self) -> bool {
        !matches!(self, TypeTag::Byte)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bool" | "boolean" => Ok(TypeTag::Bool),
            "byte" | "u8" => Ok(TypeTag::Byte),
            "int" | "integer" | "i64" => Ok(TypeTag::Int),
            "float" | "double" | "f64" => Ok(TypeTag::Float),
            "string" | "str" | "text" => Ok(TypeTag::String),
            _ => Err(StreamError::InvalidTypeTag(s.to_string())),
        }
    }
}

impl TryFrom<u8> for TypeTag {
    type Error = StreamError;

    fn try_from(value: u8) -> Result<Self> {
        TypeTag::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| StreamError::InvalidTypeTag(value.to_string()))
    }
}

/// Parses a comma-separated list of tag names such as `bool,int,string`.
///
/// Whitespace around names is ignored. An empty or blank input yields an
/// empty schema.
pub fn parse_schema(spec: &str) -> Result<Vec<TypeTag>> {
    if spec.trim().is_empty() {
        return Ok(Vec::new());
    }
    spec.split(',').map(str::parse).collect()
}

/// One cell of a row.
///
/// Conversions from the common Rust numeric widths widen at construction, so
/// an `Int` column accepts anything built from `i8`..`u64`. `u64` and `usize`
/// values above `i64::MAX` wrap to negative numbers.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// Owned string.
    Str(String),
}

impl Value {
    /// Tag of the column kind this value encodes as.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Bool(_) => TypeTag::Bool,
            Value::Int(_) => TypeTag::Int,
            Value::Float(_) => TypeTag::Float,
            Value::Str(_) => TypeTag::String,
        }
    }

    /// Short kind name used in mismatch reports.
    pub fn kind(&self) -> &'static str {
        self.type_tag().name()
    }

    /// Bytes this value occupies once encoded.
    pub fn encoded_len(&self) -> usize {
        match self {
            Value::Str(s) => LEN_PREFIX + s.len(),
            other => other.type_tag().fixed_width().unwrap_or_default(),
        }
    }

    /// Returns the boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float, if this is one.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the string slice, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
        }
    }
}

/// Total encoded size of a row, handy for sizing a stream up front.
pub fn encoded_row_len(row: &[Value]) -> usize {
    row.iter().map(Value::encoded_len).sum()
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(value as i64)
                }
            }
        )*
    };
}

int_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}
