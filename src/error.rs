//! Error type shared by the stream codec and the row marshal engine.

use thiserror::Error;

use crate::schema::TypeTag;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StreamError>;

/// Failures reported by stream getters and the schema marshal engine.
///
/// None of these are fatal: a getter that fails leaves the buffer and the read
/// cursor exactly as they were, and a failed marshal keeps whatever it had
/// already appended.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StreamError {
    /// Fewer unread bytes than the value needs.
    #[error("{op}: requires {required} bytes, has {available}")]
    InsufficientBytes {
        /// Getter that failed.
        op: &'static str,
        /// Bytes the value occupies.
        required: usize,
        /// Unread bytes at the cursor.
        available: usize,
    },
    /// Not even the 4-byte text length prefix is available.
    #[error("{op}: requires {required} bytes at least, has {available}")]
    TruncatedLengthPrefix {
        /// Getter that failed.
        op: &'static str,
        /// Size of the length prefix.
        required: usize,
        /// Unread bytes at the cursor.
        available: usize,
    },
    /// A text payload is not valid UTF-8.
    #[error("{op}: {len} byte payload at offset {offset} is not valid UTF-8")]
    InvalidUtf8 {
        /// Getter that failed.
        op: &'static str,
        /// Buffer offset of the payload (after the prefix).
        offset: usize,
        /// Payload length announced by the prefix.
        len: usize,
    },
    /// A row's value count differs from the schema length.
    #[error("marshal: row {row} has {len} values, schema has {expected}")]
    ShapeMismatch {
        /// Index of the offending row.
        row: usize,
        /// Values in that row.
        len: usize,
        /// Schema length.
        expected: usize,
    },
    /// A row value does not fit its column's type tag.
    #[error("marshal: rows[{row}][{column}]=\"{value}\" is {actual}, expected {expected}")]
    TypeMismatch {
        /// Index of the offending row.
        row: usize,
        /// Column within the row.
        column: usize,
        /// Rendered value.
        value: String,
        /// Kind of the supplied value.
        actual: &'static str,
        /// Declared column type.
        expected: TypeTag,
    },
    /// The schema contains a tag the marshal engine does not encode.
    #[error("{op}: column {column} uses unsupported type tag {tag}")]
    UnsupportedColumn {
        /// Operation that rejected the schema.
        op: &'static str,
        /// Column index.
        column: usize,
        /// Rejected tag.
        tag: TypeTag,
    },
    /// An empty schema cannot make progress over a non-empty buffer.
    #[error("unmarshal: empty schema cannot consume {remaining} buffered bytes")]
    EmptySchema {
        /// Bytes held by the buffer.
        remaining: usize,
    },
    /// Unknown type tag name or discriminant.
    #[error("invalid type tag '{0}'")]
    InvalidTypeTag(String),
    /// Unknown byte order name.
    #[error("invalid byte order '{0}'")]
    InvalidEndian(String),
}

impl StreamError {
    /// Returns `true` when the failure is caused by missing input bytes, i.e. the
    /// same call may succeed once more bytes have been appended.
    pub fn is_insufficient(&self) -> bool {
        matches!(
            self,
            StreamError::InsufficientBytes { .. } | StreamError::TruncatedLengthPrefix { .. }
        )
    }
}
