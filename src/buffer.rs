//! A growable byte buffer used throughout the parser for input staging,
//! scratch space, and rendered output.
//!
//! Unlike the library this crate's shape is drawn from, there is no C
//! allocator underneath: a `Buffer` is a thin wrapper around `Vec<u8>` that
//! preserves the original's growth discipline (grow by a multiple of `unit`,
//! cap total size) so callers that relied on that behavior -- bounded memory
//! under pathological input -- keep getting it.

use std::fmt;
use std::io::{self, Read, Write};
use std::ops::{Deref, DerefMut};
use std::str;

use crate::error::{Error, Result, BUFFER_MAX_ALLOC_SIZE};

/// A growable byte buffer.
///
/// `unit` is the growth granularity: when the buffer needs more room it grows
/// to the next multiple of `unit` bytes. A `unit` of 0 marks the buffer as a
/// fixed, immutable view -- attempts to grow it fail.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    data: Vec<u8>,
    unit: usize,
}

impl Buffer {
    /// Creates an empty buffer that grows in increments of `unit` bytes.
    pub fn new(unit: usize) -> Buffer {
        Buffer {
            data: Vec::new(),
            unit,
        }
    }

    /// Creates a buffer by copying the given bytes, with no further growth
    /// granularity (`unit = 0`): useful for short-lived, read-only views.
    pub fn from_slice(bytes: &[u8]) -> Buffer {
        Buffer {
            data: bytes.to_vec(),
            unit: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn unit(&self) -> usize {
        self.unit
    }

    /// Empties the buffer without releasing its allocation.
    pub fn reset(&mut self) {
        self.data.clear();
    }

    fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        let needed = self.data.len() + additional;
        if needed <= self.data.capacity() {
            return Ok(());
        }

        if needed > BUFFER_MAX_ALLOC_SIZE {
            log::warn!("buffer grow to {} bytes exceeds the {}-byte cap", needed, BUFFER_MAX_ALLOC_SIZE);
            return Err(Error::AllocationFailed(BUFFER_MAX_ALLOC_SIZE));
        }

        let unit = if self.unit == 0 { 1 } else { self.unit };
        let target = ((needed + unit - 1) / unit) * unit;
        let target = target.min(BUFFER_MAX_ALLOC_SIZE);

        if target < needed {
            log::warn!("buffer grow to {} bytes exceeds the {}-byte cap", needed, BUFFER_MAX_ALLOC_SIZE);
            return Err(Error::AllocationFailed(BUFFER_MAX_ALLOC_SIZE));
        }

        let additional_capacity = target - self.data.len();
        self.data.reserve(additional_capacity);
        Ok(())
    }

    /// Appends raw bytes, growing as needed.
    pub fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_capacity(bytes.len())?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Appends a single byte.
    pub fn putc(&mut self, byte: u8) -> Result<()> {
        self.put(&[byte])
    }

    /// Appends formatted text, mirroring the original's `hoedown_buffer_printf`.
    pub fn printf(&mut self, args: fmt::Arguments) -> Result<()> {
        // `fmt::Write` on a `String` never fails except on allocation; render
        // into a scratch `String` first so a formatting panic can't leave the
        // buffer half-written.
        let rendered = fmt::format(args);
        self.put(rendered.as_bytes())
    }

    /// Drops the first `count` bytes, shifting the remainder down. Mirrors
    /// the original's `hoedown_buffer_slurp`.
    pub fn slurp(&mut self, count: usize) {
        let count = count.min(self.data.len());
        self.data.drain(0..count);
    }

    /// Removes the last `count` bytes, used by autolink handling to discard
    /// already-emitted scheme/prefix bytes before re-rendering as a link.
    pub fn truncate_by(&mut self, count: usize) {
        let new_len = self.data.len().saturating_sub(count);
        self.data.truncate(new_len);
    }

    /// Returns true if `self` starts with `prefix`.
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.data.starts_with(prefix)
    }

    /// Returns the buffer contents as a NUL-terminated byte vector without
    /// counting the NUL in `len()`. Mirrors `hoedown_buffer_cstr`.
    pub fn to_cstr(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 1);
        out.extend_from_slice(&self.data);
        out.push(0);
        out
    }

    /// Appends the full contents of `other`.
    pub fn pipe(&mut self, other: &Buffer) -> Result<()> {
        self.put(&other.data)
    }

    /// Interprets the buffer's bytes as UTF-8.
    pub fn to_str(&self) -> std::result::Result<&str, str::Utf8Error> {
        str::from_utf8(&self.data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl From<&[u8]> for Buffer {
    fn from(bytes: &[u8]) -> Buffer {
        Buffer::from_slice(bytes)
    }
}

impl From<&str> for Buffer {
    fn from(s: &str) -> Buffer {
        Buffer::from_slice(s.as_bytes())
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(data: Vec<u8>) -> Buffer {
        Buffer { data, unit: 0 }
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl Read for Buffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut slice: &[u8] = &self.data;
        let n = Read::read(&mut slice, buf)?;
        self.slurp(n);
        Ok(n)
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.put(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_and_appends() {
        let mut buf = Buffer::new(4);
        buf.put(b"hello").unwrap();
        assert_eq!(&*buf, b"hello");
    }

    #[test]
    fn slurp_drops_prefix() {
        let mut buf = Buffer::new(4);
        buf.put(b"hello world").unwrap();
        buf.slurp(6);
        assert_eq!(&*buf, b"world");
    }

    #[test]
    fn truncate_by_drops_suffix() {
        let mut buf = Buffer::new(4);
        buf.put(b"hello world").unwrap();
        buf.truncate_by(6);
        assert_eq!(&*buf, b"hello");
    }

    #[test]
    fn rejects_growth_past_cap() {
        let mut buf = Buffer::new(4);
        let oversized = vec![0u8; BUFFER_MAX_ALLOC_SIZE + 1];
        assert!(buf.put(&oversized).is_err());
    }

    #[test]
    fn cstr_appends_nul_without_counting_it() {
        let mut buf = Buffer::new(4);
        buf.put(b"hi").unwrap();
        let c = buf.to_cstr();
        assert_eq!(c, b"hi\0");
        assert_eq!(buf.len(), 2);
    }
}
