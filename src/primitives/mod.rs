//! Low-level primitives shared by the stream codec.

/// Byte-order selection and fixed-width encoding helpers.
pub mod bytes;
