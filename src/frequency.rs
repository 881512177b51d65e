use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{HuffmanError, Result};

pub const SYMBOLS: usize = u8::MAX as usize + 1;

/// How many times one byte value occurs in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteFrequency {
    pub byte: u8,
    pub count: u64,
}

impl ByteFrequency {
    pub fn new(byte: u8, count: u64) -> Self {
        Self { byte, count }
    }
}

/// Occurrence counters for all 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOLS],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; SYMBOLS] }
    }
}

impl FrequencyTable {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::default();
        table.extend(bytes);
        table
    }

    /// Counts every byte of `reader` until it is exhausted.
    pub fn scan<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut table = Self::default();
        let mut buf = [0u8; 8 * 1024];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => table.extend(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(table)
    }

    /// Opens and scans the file at `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| HuffmanError::open(path, e))?;
        Self::scan(file).map_err(|e| HuffmanError::read(path, e))
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.counts[b as usize] += 1;
        }
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Non-zero counters in ascending byte order.
    pub fn frequencies(&self) -> Vec<ByteFrequency> {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count != 0)
            .map(|(byte, &count)| ByteFrequency::new(byte as u8, count))
            .collect()
    }
}
