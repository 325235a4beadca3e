//! Counting writer wrapper for tracking bytes written and their checksum.

use std::io::{Result, Write};

/// A writer wrapper that counts and checksums bytes written through it.
pub(crate) struct CountingWriter<W> {
    inner: W,
    hasher: crc32fast::Hasher,
    bytes_written: u64,
}

impl<W> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
            bytes_written: 0,
        }
    }

    pub(crate) fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// CRC-32 of everything written so far.
    pub(crate) fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}
