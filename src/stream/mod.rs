#![forbid(unsafe_code)]
//! The append-only byte buffer and its read cursor.
//!
//! Writes always append at the end. Reads consume from the cursor forward and
//! advance it only on success, so a failed get can be retried once more bytes
//! have been appended with [`Stream::extend_from_slice`].

use core::fmt;

use bytes::{Bytes, BytesMut};
use tracing::trace;

use crate::error::{Result, StreamError};
use crate::options::StreamOptions;
use crate::primitives::bytes::Endian;

mod codec;

/// Growable byte sequence with an independent read cursor.
pub struct Stream {
    buf: BytesMut,
    capacity: usize,
    read_pos: usize,
    endian: Endian,
}

impl Stream {
    /// Creates an empty little-endian stream with `capacity` bytes reserved.
    pub fn new(capacity: usize) -> Self {
        Self::with_options(StreamOptions::new().capacity(capacity))
    }

    /// Creates an empty stream from explicit options.
    pub fn with_options(opts: StreamOptions) -> Self {
        Self {
            buf: BytesMut::with_capacity(opts.capacity),
            capacity: opts.capacity,
            read_pos: 0,
            endian: opts.endian.resolve(),
        }
    }

    /// Creates a stream holding a copy of `data` with the cursor at zero.
    pub fn from_slice(data: &[u8], opts: StreamOptions) -> Self {
        let mut stream = Self::with_options(opts);
        stream.extend_from_slice(data);
        stream
    }

    /// Drops all content and reallocates storage to the original capacity hint.
    pub fn reset(&mut self) {
        trace!(len = self.buf.len(), capacity = self.capacity, "stream reset");
        self.buf = BytesMut::with_capacity(self.capacity);
        self.read_pos = 0;
    }

    /// Write extent: number of bytes appended so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` when nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Capacity hint the stream was constructed with.
    pub fn capacity_hint(&self) -> usize {
        self.capacity
    }

    /// Concrete byte order in effect (never [`Endian::Native`]).
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Position of the next unread byte.
    pub fn read_pos(&self) -> usize {
        self.read_pos
    }

    /// Moves the cursor. No bounds check happens here; a position past the
    /// write extent surfaces as an insufficient-bytes error on the next get.
    pub fn set_read_pos(&mut self, pos: usize) {
        self.read_pos = pos;
    }

    /// Rewinds the cursor to the start of the buffer.
    pub fn reset_read_pos(&mut self) {
        self.set_read_pos(0);
    }

    /// Unread bytes between the cursor and the write extent.
    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.read_pos)
    }

    /// Everything written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Bytes from the cursor to the write extent.
    pub fn unread(&self) -> &[u8] {
        self.buf.get(self.read_pos..).unwrap_or_default()
    }

    /// Appends raw bytes verbatim, e.g. the next chunk of a received payload.
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Consumes the stream and returns its content as immutable [`Bytes`].
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    /// Checks that `N` bytes are unread, copies them out and advances the cursor.
    fn take<const N: usize>(&mut self, op: &'static str) -> Result<[u8; N]> {
        let available = self.remaining();
        if available < N {
            return Err(StreamError::InsufficientBytes {
                op,
                required: N,
                available,
            });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.read_pos..self.read_pos + N]);
        self.read_pos += N;
        Ok(out)
    }
}

impl Default for Stream {
    fn default() -> Self {
        Self::with_options(StreamOptions::default())
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("len", &self.buf.len())
            .field("read_pos", &self.read_pos)
            .field("capacity", &self.capacity)
            .field("endian", &self.endian)
            .finish()
    }
}
