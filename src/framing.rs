//! Compressed file layout and the whole-file encode/decode passes.
//!
//! ```text
//! [payload_bit_length : u64]
//! [frequency_count    : u64]
//! frequency_count x { [byte : u8] [count : u64] }
//! [payload : payload_bit_length bits, LSB first, zero padded]
//! ```
//!
//! Integers use native byte order.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::bit_stream::{InputBitStream, OutputBitStream};
use crate::error::{HuffmanError, Result};
use crate::frequency::{ByteFrequency, FrequencyTable, SYMBOLS};
use crate::table::CodeTable;
use crate::tree::HuffmanTree;

const WORD_BYTES: u64 = std::mem::size_of::<u64>() as u64;
const ENTRY_BYTES: u64 = 1 + WORD_BYTES;

/// Byte sizes of one encode or decode run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeStatistic {
    pub original: u64,
    pub compressed: u64,
    pub header: u64,
}

/// Everything the decoder needs to rebuild the encoder's tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub payload_bits: u64,
    pub frequencies: Vec<ByteFrequency>,
}

impl Header {
    pub fn byte_len(&self) -> u64 {
        2 * WORD_BYTES + ENTRY_BYTES * self.frequencies.len() as u64
    }

    /// Writes the header and returns how many bytes it took.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<u64> {
        writer.write_all(&self.payload_bits.to_ne_bytes())?;
        writer.write_all(&(self.frequencies.len() as u64).to_ne_bytes())?;
        for f in &self.frequencies {
            writer.write_all(&[f.byte])?;
            writer.write_all(&f.count.to_ne_bytes())?;
        }
        Ok(self.byte_len())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> io::Result<Self> {
        let payload_bits = read_u64(reader)?;
        let count = read_u64(reader)?;
        if count == 0 || count > SYMBOLS as u64 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frequency count {count} out of range"),
            ));
        }

        let mut frequencies = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut byte = [0u8; 1];
            reader.read_exact(&mut byte)?;
            let count = read_u64(reader)?;
            frequencies.push(ByteFrequency::new(byte[0], count));
        }

        Ok(Self {
            payload_bits,
            frequencies,
        })
    }
}

fn read_u64<R: Read>(reader: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; WORD_BYTES as usize];
    reader.read_exact(&mut buf)?;
    Ok(u64::from_ne_bytes(buf))
}

fn create_output(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| HuffmanError::open(path, e))
}

/// Compresses the file at `input` into `output`.
///
/// The input is read twice: once to count bytes, once to emit codewords.
pub fn encode(input: &Path, output: &Path) -> Result<SizeStatistic> {
    let counts = FrequencyTable::from_path(input)?;
    let frequencies = counts.frequencies();

    let Some(tree) = HuffmanTree::new(&frequencies) else {
        create_output(output)?;
        info!(input = %input.display(), "input is empty, wrote empty output");
        return Ok(SizeStatistic::default());
    };
    let table = tree.table();
    debug!(
        symbols = frequencies.len(),
        depth = tree.depth(),
        "built code table"
    );

    let payload_bits = table.payload_bits(&frequencies).map_err(|e| {
        error!(error = %e, "code table does not cover the counted bytes");
        HuffmanError::from(e)
    })?;
    let header = Header {
        payload_bits,
        frequencies,
    };

    let mut out = BufWriter::new(create_output(output)?);
    let header_bytes = header
        .write_to(&mut out)
        .map_err(|e| HuffmanError::write(output, e))?;
    let compressed = write_payload(input, &mut out, output, &table)?;
    out.flush().map_err(|e| HuffmanError::write(output, e))?;

    let stats = SizeStatistic {
        original: counts.total(),
        compressed,
        header: header_bytes,
    };
    info!(
        original = stats.original,
        compressed = stats.compressed,
        header = stats.header,
        "encoded {}",
        input.display()
    );
    Ok(stats)
}

fn write_payload<W: Write>(
    input: &Path,
    sink: &mut W,
    output: &Path,
    table: &CodeTable,
) -> Result<u64> {
    let file = File::open(input).map_err(|e| HuffmanError::open(input, e))?;
    let mut stream = OutputBitStream::new(sink, output);

    for byte in BufReader::new(file).bytes() {
        let byte = byte.map_err(|e| HuffmanError::read(input, e))?;
        let code = table.get(byte).map_err(|e| {
            error!(error = %e, "byte missing from code table");
            HuffmanError::from(e)
        })?;
        stream.write(code)?;
    }

    stream.close()
}

/// Restores the original file from the compressed file at `input`.
pub fn decode(input: &Path, output: &Path) -> Result<SizeStatistic> {
    let file = File::open(input).map_err(|e| HuffmanError::open(input, e))?;
    let len = file
        .metadata()
        .map_err(|e| HuffmanError::read(input, e))?
        .len();
    if len == 0 {
        create_output(output)?;
        info!(input = %input.display(), "input is empty, wrote empty output");
        return Ok(SizeStatistic::default());
    }

    let mut reader = BufReader::new(file);
    let header = Header::read_from(&mut reader).map_err(|e| {
        warn!(input = %input.display(), error = %e, "unreadable header");
        HuffmanError::invalid(input)
    })?;

    let tree = HuffmanTree::new(&header.frequencies).ok_or_else(|| HuffmanError::invalid(input))?;
    let expected_bits = tree
        .table()
        .payload_bits(&header.frequencies)
        .map_err(|_| HuffmanError::invalid(input))?;
    if expected_bits != header.payload_bits {
        warn!(
            input = %input.display(),
            declared = header.payload_bits,
            expected = expected_bits,
            "payload length does not match frequencies"
        );
        return Err(HuffmanError::invalid(input));
    }

    let mut out = BufWriter::new(create_output(output)?);
    let (original, compressed) =
        write_decoded(&mut reader, input, &mut out, output, &tree, header.payload_bits)?;
    out.flush().map_err(|e| HuffmanError::write(output, e))?;

    let stats = SizeStatistic {
        original,
        compressed,
        header: header.byte_len(),
    };
    info!(
        original = stats.original,
        compressed = stats.compressed,
        header = stats.header,
        "decoded {}",
        input.display()
    );
    Ok(stats)
}

/// Walks the tree for exactly `payload_bits` bits. Returns the number of
/// bytes written and the number of payload bytes consumed.
fn write_decoded<R: Read, W: Write>(
    source: &mut R,
    input: &Path,
    sink: &mut W,
    output: &Path,
    tree: &HuffmanTree,
    payload_bits: u64,
) -> Result<(u64, u64)> {
    let mut stream = InputBitStream::new(source, input);
    let mut node = tree.root();
    let mut written = 0u64;

    for _ in 0..payload_bits {
        let bit = stream.read_bit()?;
        node = tree.go(node, bit).map_err(|e| {
            warn!(input = %input.display(), error = %e, "payload leaves the tree");
            HuffmanError::invalid(input)
        })?;

        if let Some(byte) = node.byte() {
            sink.write_all(&[byte])
                .map_err(|e| HuffmanError::write(output, e))?;
            written += 1;
            node = tree.root();
        }
    }

    if !tree.is_root(node) {
        warn!(input = %input.display(), "payload ends inside a codeword");
        return Err(HuffmanError::invalid(input));
    }

    Ok((written, stream.bytes_read()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn abc_header() -> Header {
        Header {
            payload_bits: 19,
            frequencies: vec![
                ByteFrequency::new(b'a', 5),
                ByteFrequency::new(b'b', 3),
                ByteFrequency::new(b'c', 4),
            ],
        }
    }

    #[test]
    fn header_layout() {
        let mut buf = Vec::new();
        let n = abc_header().write_to(&mut buf).unwrap();

        assert_eq!(n, 16 + 3 * 9);
        assert_eq!(buf.len() as u64, n);
        assert_eq!(&buf[0..8], &19u64.to_ne_bytes());
        assert_eq!(&buf[8..16], &3u64.to_ne_bytes());
        assert_eq!(buf[16], b'a');
        assert_eq!(&buf[17..25], &5u64.to_ne_bytes());
        assert_eq!(buf[25], b'b');

        let read = Header::read_from(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(read, abc_header());
    }

    #[test]
    fn truncated_header_fails() {
        let mut buf = Vec::new();
        abc_header().write_to(&mut buf).unwrap();

        for len in [0, 7, 15, 16, 20, buf.len() - 1] {
            let err = Header::read_from(&mut Cursor::new(&buf[..len])).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof, "len {len}");
        }
    }

    #[test]
    fn frequency_count_out_of_range() {
        for count in [0u64, 257, u64::MAX] {
            let mut buf = Vec::new();
            buf.extend_from_slice(&1u64.to_ne_bytes());
            buf.extend_from_slice(&count.to_ne_bytes());
            let err = Header::read_from(&mut Cursor::new(&buf)).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        }
    }

    #[test]
    fn decode_walk_stops_at_declared_length() {
        let header = abc_header();
        let tree = HuffmanTree::new(&header.frequencies).unwrap();

        // "abc" is 0 10 11, packed LSB first, followed by garbage.
        let payload = [0b0001_1010u8, 0xff];
        let mut out = Vec::new();
        let (written, consumed) = write_decoded(
            &mut Cursor::new(&payload[..]),
            Path::new("in"),
            &mut out,
            Path::new("out"),
            &tree,
            5,
        )
        .unwrap();

        assert_eq!(out, b"abc");
        assert_eq!((written, consumed), (3, 1));
    }

    #[test]
    fn decode_walk_rejects_partial_codeword() {
        let tree = HuffmanTree::new(&abc_header().frequencies).unwrap();
        let mut out = Vec::new();
        let err = write_decoded(
            &mut Cursor::new(&[0b0000_0010u8][..]),
            Path::new("in"),
            &mut out,
            Path::new("out"),
            &tree,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, HuffmanError::InvalidCompressedFile { .. }));
    }

    #[test]
    fn decode_walk_rejects_dead_end() {
        let tree = HuffmanTree::new(&[ByteFrequency::new(b'A', 3)]).unwrap();
        let mut out = Vec::new();
        let err = write_decoded(
            &mut Cursor::new(&[0b0000_0100u8][..]),
            Path::new("in"),
            &mut out,
            Path::new("out"),
            &tree,
            3,
        )
        .unwrap_err();
        assert!(matches!(err, HuffmanError::InvalidCompressedFile { .. }));
        assert_eq!(out, b"AA");
    }
}
