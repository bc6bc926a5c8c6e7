//! Typed put/get pairs for the five primitive kinds.
//!
//! | Kind   | Layout                                                    |
//! |--------|-----------------------------------------------------------|
//! | bool   | 1 byte, `0` false, anything else true                      |
//! | byte   | 1 byte verbatim                                           |
//! | int    | 8 bytes, two's complement                                 |
//! | float  | 8 bytes, IEEE-754 binary64                                |
//! | string | `u32` byte length, then that many UTF-8 bytes             |
//!
//! Multi-byte fields follow the stream's [`crate::Endian`].

use bytes::BufMut;

use super::Stream;
use crate::error::{Result, StreamError};
use crate::primitives::bytes::{F64_LEN, I64_LEN, LEN_PREFIX};

impl Stream {
    /// Appends a boolean as `0x00` or `0x01`.
    pub fn put_bool(&mut self, v: bool) {
        self.buf.put_u8(u8::from(v));
    }

    /// Reads one byte; any non-zero value is `true`.
    pub fn get_bool(&mut self) -> Result<bool> {
        let [b] = self.take::<1>("get_bool")?;
        Ok(b != 0)
    }

    /// Appends a single raw byte.
    pub fn put_byte(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    /// Reads a single raw byte.
    pub fn get_byte(&mut self) -> Result<u8> {
        let [b] = self.take::<1>("get_byte")?;
        Ok(b)
    }

    /// Appends a signed 64-bit integer.
    pub fn put_int(&mut self, v: i64) {
        self.endian.put_i64(&mut self.buf, v);
    }

    /// Reads a signed 64-bit integer.
    pub fn get_int(&mut self) -> Result<i64> {
        let raw = self.take::<I64_LEN>("get_int")?;
        Ok(self.endian.read_i64(raw))
    }

    /// Appends a binary64 float.
    pub fn put_float(&mut self, v: f64) {
        self.endian.put_f64(&mut self.buf, v);
    }

    /// Reads a binary64 float.
    pub fn get_float(&mut self) -> Result<f64> {
        let raw = self.take::<F64_LEN>("get_float")?;
        Ok(self.endian.read_f64(raw))
    }

    /// Appends a length-prefixed string. An empty string writes only the
    /// zero prefix.
    ///
    /// # Panics
    ///
    /// Panics if `v` is longer than `i32::MAX` bytes, which the 32-bit prefix
    /// cannot describe.
    pub fn put_string(&mut self, v: &str) {
        let len = v.len();
        assert!(
            len <= i32::MAX as usize,
            "string too long for a 32-bit length prefix ({len} bytes)"
        );
        self.buf.reserve(LEN_PREFIX + len);
        self.endian.put_u32(&mut self.buf, len as u32);
        self.buf.extend_from_slice(v.as_bytes());
    }

    /// Reads a length-prefixed string into an owned `String`.
    pub fn get_string(&mut self) -> Result<String> {
        self.read_str("get_string").map(str::to_owned)
    }

    /// Reads a length-prefixed string as a view into the buffer.
    ///
    /// The view borrows the stream, so no append or reset can happen while it
    /// is alive.
    pub fn get_str(&mut self) -> Result<&str> {
        self.read_str("get_str")
    }

    /// Reads a length-prefixed field as raw bytes without UTF-8 validation.
    pub fn get_text_bytes(&mut self) -> Result<&[u8]> {
        let (start, len) = self.text_span("get_text_bytes")?;
        let end = start + len;
        self.read_pos = end;
        Ok(&self.buf[start..end])
    }

    fn read_str(&mut self, op: &'static str) -> Result<&str> {
        let (start, len) = self.text_span(op)?;
        let end = start + len;
        let text = core::str::from_utf8(&self.buf[start..end]).map_err(|_| {
            StreamError::InvalidUtf8 {
                op,
                offset: start,
                len,
            }
        })?;
        self.read_pos = end;
        Ok(text)
    }

    /// Validates a text field at the cursor and returns `(payload_start, len)`
    /// without moving the cursor.
    fn text_span(&self, op: &'static str) -> Result<(usize, usize)> {
        let available = self.remaining();
        if available < LEN_PREFIX {
            return Err(StreamError::TruncatedLengthPrefix {
                op,
                required: LEN_PREFIX,
                available,
            });
        }
        let mut prefix = [0u8; LEN_PREFIX];
        prefix.copy_from_slice(&self.buf[self.read_pos..self.read_pos + LEN_PREFIX]);
        let len = self.endian.read_u32(prefix) as usize;
        let required = LEN_PREFIX.saturating_add(len);
        if available < required {
            return Err(StreamError::InsufficientBytes {
                op,
                required,
                available,
            });
        }
        Ok((self.read_pos + LEN_PREFIX, len))
    }
}
