//! Append-only binary stream with independent write and read cursors.
//!
//! A [`Stream`] owns a growable byte sequence. Values are appended with typed
//! `put_*` calls and consumed from a separate read cursor with fallible `get_*`
//! calls. On top of the primitive codec, [`Stream::marshal`] and
//! [`Stream::unmarshal`] encode whole rows of [`Value`]s against an ordered
//! [`TypeTag`] schema.
//!
//! Fixed-width numerics and the text length prefix use the byte order selected
//! through [`StreamOptions`]; the default is little-endian. Buffers encoded with
//! [`Endian::Native`] are only portable between hosts sharing the same byte order.
//!
//! A `Stream` is not synchronized. Share it across threads only behind external
//! mutual exclusion.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod error;
pub mod options;
pub mod primitives;
pub mod schema;
pub mod stream;

pub use error::{Result, StreamError};
pub use options::StreamOptions;
pub use primitives::bytes::Endian;
pub use schema::{encoded_row_len, parse_schema, validate_schema, TypeTag, Value};
pub use stream::Stream;
