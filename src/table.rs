use bitvec::prelude::*;

use crate::error::LogicError;
use crate::frequency::{ByteFrequency, SYMBOLS};

/// Codeword per byte value. Unassigned values hold an empty codeword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<BitVec>,
}

impl Default for CodeTable {
    fn default() -> Self {
        Self {
            codes: vec![BitVec::new(); SYMBOLS],
        }
    }
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codeword for `byte`, failing if the byte never occurred in the
    /// frequencies the table was derived from.
    pub fn get(&self, byte: u8) -> Result<&BitSlice, LogicError> {
        let code = &self.codes[byte as usize];
        if code.is_empty() {
            return Err(LogicError::MissingCodeword { byte });
        }
        Ok(code.as_bitslice())
    }

    pub fn set(&mut self, byte: u8, code: BitVec) {
        self.codes[byte as usize] = code;
    }

    /// Assigned `(byte, codeword)` pairs in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &BitSlice)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter(|(_, code)| !code.is_empty())
            .map(|(byte, code)| (byte as u8, code.as_bitslice()))
    }

    /// Encoded length in bits of a file with these byte counts.
    pub fn payload_bits(&self, frequencies: &[ByteFrequency]) -> Result<u64, LogicError> {
        frequencies.iter().try_fold(0u64, |total, f| {
            let len = self.get(f.byte)?.len() as u64;
            Ok(total.saturating_add(len.saturating_mul(f.count)))
        })
    }
}

impl FromIterator<(u8, BitVec)> for CodeTable {
    fn from_iter<I: IntoIterator<Item = (u8, BitVec)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (byte, code) in iter {
            table.set(byte, code);
        }
        table
    }
}
