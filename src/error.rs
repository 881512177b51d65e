use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An invariant violation inside the tree or the code table.
///
/// During encoding this can only mean the table was built wrong. During
/// decoding it means the payload walked off the tree, and is reported as
/// [`HuffmanError::InvalidCompressedFile`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("node has no child for bit {bit}")]
    MissingChild { bit: bool },

    #[error("byte {byte:#04x} has no codeword")]
    MissingCodeword { byte: u8 },
}

#[derive(Debug, Error)]
pub enum HuffmanError {
    #[error("load file \"{}\" error: {source}", .path.display())]
    FileOpen { path: PathBuf, source: io::Error },

    #[error("read file \"{}\" error: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("write file \"{}\" error: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("compressed file \"{}\" is incorrect", .path.display())]
    InvalidCompressedFile { path: PathBuf },

    #[error("internal error: {0}")]
    Logic(#[from] LogicError),
}

impl HuffmanError {
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HuffmanError::FileOpen { path: path.into(), source }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HuffmanError::Read { path: path.into(), source }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HuffmanError::Write { path: path.into(), source }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>) -> Self {
        HuffmanError::InvalidCompressedFile { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, HuffmanError>;
