//! Bit-granular views over byte streams.
//!
//! Bits are packed least-significant first: the first bit written lands in
//! bit 0 of the first byte.

use bitvec::prelude::*;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{HuffmanError, Result};

pub const BYTE_BITS: u8 = u8::BITS as u8;

/// Reads single bits from a borrowed byte source, one byte at a time.
pub struct InputBitStream<'a, R: Read> {
    source: &'a mut R,
    path: &'a Path,
    current: u8,
    consumed: u8,
    bytes_read: u64,
}

impl<'a, R: Read> InputBitStream<'a, R> {
    pub fn new(source: &'a mut R, path: &'a Path) -> Self {
        Self {
            source,
            path,
            current: 0,
            consumed: BYTE_BITS,
            bytes_read: 0,
        }
    }

    /// Returns the next bit.
    ///
    /// Running out of bytes means the payload is shorter than its header
    /// claims, so this fails with [`HuffmanError::InvalidCompressedFile`].
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.consumed == BYTE_BITS {
            let mut buf = [0u8; 1];
            if let Err(e) = self.source.read_exact(&mut buf) {
                debug!(path = %self.path.display(), error = %e, "bit stream ran dry");
                return Err(HuffmanError::invalid(self.path));
            }
            self.current = buf[0];
            self.consumed = 0;
            self.bytes_read += 1;
        }

        let bit = (self.current >> self.consumed) & 1 == 1;
        self.consumed += 1;
        Ok(bit)
    }

    /// Number of bytes pulled from the source so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }
}

/// Packs single bits into a borrowed byte sink.
///
/// A full byte is only written once the next bit arrives or the stream is
/// closed, so a payload of `n` bits always takes `ceil(n / 8)` bytes.
/// Dropping an unclosed stream still flushes the pending byte.
pub struct OutputBitStream<'a, W: Write> {
    sink: &'a mut W,
    path: &'a Path,
    current: u8,
    written: u8,
    bytes_written: u64,
    closed: bool,
}

impl<'a, W: Write> OutputBitStream<'a, W> {
    pub fn new(sink: &'a mut W, path: &'a Path) -> Self {
        Self {
            sink,
            path,
            current: 0,
            written: 0,
            bytes_written: 0,
            closed: false,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if self.written == BYTE_BITS {
            self.flush_byte()?;
        }
        self.current |= u8::from(bit) << self.written;
        self.written += 1;
        Ok(())
    }

    pub fn write(&mut self, bits: &BitSlice) -> Result<()> {
        for bit in bits.iter().by_vals() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Writes the pending byte, zero-padded in its high bits, and returns
    /// the total number of bytes this stream produced.
    pub fn close(mut self) -> Result<u64> {
        self.closed = true;
        self.flush_byte()?;
        Ok(self.bytes_written)
    }

    fn flush_byte(&mut self) -> Result<()> {
        self.sink
            .write_all(&[self.current])
            .map_err(|e| HuffmanError::write(self.path, e))?;
        self.current = 0;
        self.written = 0;
        self.bytes_written += 1;
        Ok(())
    }
}

impl<W: Write> Drop for OutputBitStream<'_, W> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.flush_byte();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn alphabet_bits() -> BitVec {
        let mut bv = BitVec::new();
        for c in b'a'..=b'z' {
            for j in 0..8 {
                bv.push((c >> j) & 1 == 1);
            }
        }
        bv
    }

    #[test]
    fn input_reads_lsb_first_then_fails() {
        let bytes: Vec<u8> = (b'a'..=b'z').collect();
        let mut src = Cursor::new(bytes);
        let path = Path::new("alphabet");
        let mut stream = InputBitStream::new(&mut src, path);

        for c in b'a'..=b'z' {
            for j in 0..8 {
                assert_eq!(stream.read_bit().unwrap(), (c >> j) & 1 == 1);
            }
        }
        assert_eq!(stream.bytes_read(), 26);
        assert!(matches!(
            stream.read_bit(),
            Err(HuffmanError::InvalidCompressedFile { .. })
        ));
    }

    #[test]
    fn output_packs_whole_bytes() {
        let mut out = Vec::new();
        let stream_bytes = {
            let mut stream = OutputBitStream::new(&mut out, Path::new("out"));
            stream.write(&alphabet_bits()).unwrap();
            stream.close().unwrap()
        };

        assert_eq!(stream_bytes, 26);
        assert_eq!(out, (b'a'..=b'z').collect::<Vec<_>>());
    }

    #[test]
    fn output_pads_partial_byte() {
        let mut out = Vec::new();
        {
            let mut stream = OutputBitStream::new(&mut out, Path::new("out"));
            stream.write(bits![1, 0, 1, 1, 0, 0, 0, 0, 1, 1]).unwrap();
            assert_eq!(stream.close().unwrap(), 2);
        }
        assert_eq!(out, vec![0b0000_1101, 0b0000_0011]);
    }

    #[test]
    fn dropped_stream_flushes() {
        let mut out = Vec::new();
        {
            let mut stream = OutputBitStream::new(&mut out, Path::new("out"));
            stream.write_bit(true).unwrap();
        }
        assert_eq!(out, vec![1]);
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_names_path() {
        let mut sink = FullDisk;
        let mut stream = OutputBitStream::new(&mut sink, Path::new("full.huff"));
        for _ in 0..8 {
            stream.write_bit(false).unwrap();
        }
        match stream.write_bit(true) {
            Err(HuffmanError::Write { path, .. }) => assert_eq!(path, Path::new("full.huff")),
            other => panic!("expected write error, got {other:?}"),
        }
    }
}
