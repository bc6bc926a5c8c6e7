#![forbid(unsafe_code)]
//! Byte-order aware encoders for the fixed-width stream layouts.
//!
//! Every multi-byte field in a stream (the `i64` and `f64` payloads and the
//! `u32` text length prefix) goes through an [`Endian`]. Nothing here looks at
//! raw memory; values are converted with the `to_*_bytes`/`from_*_bytes` family.

use core::fmt;
use core::str::FromStr;

use bytes::BufMut;

use crate::error::StreamError;

/// Width of the text length prefix.
pub const LEN_PREFIX: usize = core::mem::size_of::<u32>();
/// Width of an encoded `i64`.
pub const I64_LEN: usize = core::mem::size_of::<i64>();
/// Width of an encoded `f64`.
pub const F64_LEN: usize = core::mem::size_of::<f64>();

/// Byte order applied to fixed-width fields.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum Endian {
    /// Least significant byte first. Portable default.
    #[default]
    Little,
    /// Most significant byte first.
    Big,
    /// Whatever the executing host uses. Not portable across architectures.
    Native,
}

impl Endian {
    /// Resolves [`Endian::Native`] to the concrete order of the host.
    pub const fn resolve(self) -> Endian {
        match self {
            Endian::Native => {
                if cfg!(target_endian = "big") {
                    Endian::Big
                } else {
                    Endian::Little
                }
            }
            other => other,
        }
    }

    /// Lower-case name accepted by [`FromStr`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Endian::Little => "little",
            Endian::Big => "big",
            Endian::Native => "native",
        }
    }

    /// Appends `v` as four bytes.
    pub fn put_u32<B: BufMut>(self, dst: &mut B, v: u32) {
        match self.resolve() {
            Endian::Big => dst.put_u32(v),
            _ => dst.put_u32_le(v),
        }
    }

    /// Appends `v` as eight two's-complement bytes.
    pub fn put_i64<B: BufMut>(self, dst: &mut B, v: i64) {
        match self.resolve() {
            Endian::Big => dst.put_i64(v),
            _ => dst.put_i64_le(v),
        }
    }

    /// Appends the IEEE-754 binary64 bit pattern of `v`.
    pub fn put_f64<B: BufMut>(self, dst: &mut B, v: f64) {
        match self.resolve() {
            Endian::Big => dst.put_f64(v),
            _ => dst.put_f64_le(v),
        }
    }

    /// Decodes a length prefix.
    pub fn read_u32(self, src: [u8; LEN_PREFIX]) -> u32 {
        match self.resolve() {
            Endian::Big => u32::from_be_bytes(src),
            _ => u32::from_le_bytes(src),
        }
    }

    /// Decodes a signed 64-bit integer.
    pub fn read_i64(self, src: [u8; I64_LEN]) -> i64 {
        match self.resolve() {
            Endian::Big => i64::from_be_bytes(src),
            _ => i64::from_le_bytes(src),
        }
    }

    /// Decodes a binary64 float; NaN payloads survive bit-for-bit.
    pub fn read_f64(self, src: [u8; F64_LEN]) -> f64 {
        match self.resolve() {
            Endian::Big => f64::from_be_bytes(src),
            _ => f64::from_le_bytes(src),
        }
    }
}

impl fmt::Display for Endian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Endian {
    type Err = StreamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "little" | "le" => Ok(Endian::Little),
            "big" | "be" => Ok(Endian::Big),
            "native" | "ne" => Ok(Endian::Native),
            _ => Err(StreamError::InvalidEndian(s.to_string())),
        }
    }
}
