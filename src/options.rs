//! Construction options for [`crate::Stream`].

use crate::primitives::bytes::Endian;

/// Capacity hint used by [`StreamOptions::default`].
pub const DEFAULT_CAPACITY: usize = 4096;

/// Configuration supplied when constructing a [`crate::Stream`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StreamOptions {
    /// Bytes reserved up front and again on every reset. Advisory only: the
    /// buffer grows past it transparently.
    pub capacity: usize,
    /// Byte order for fixed-width values and text length prefixes.
    pub endian: Endian,
}

impl StreamOptions {
    /// Creates options with default settings.
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            endian: Endian::Little,
        }
    }

    /// Sets the capacity hint.
    pub fn capacity(mut self, bytes: usize) -> Self {
        self.capacity = bytes;
        self
    }

    /// Sets the byte order.
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }
}

impl Default for StreamOptions {
    fn default() -> Self {
        Self::new()
    }
}
