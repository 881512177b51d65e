//! Lossless byte-oriented file compression with Huffman codes.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let stats = huffpack::encode(Path::new("book.txt"), Path::new("book.huff"))?;
//! println!("{} -> {} + {}", stats.original, stats.compressed, stats.header);
//!
//! huffpack::decode(Path::new("book.huff"), Path::new("book.out"))?;
//! # Ok::<(), huffpack::HuffmanError>(())
//! ```

pub mod bit_stream;
pub mod error;
pub mod framing;
pub mod frequency;
pub mod table;
pub mod tree;

pub use bit_stream::{InputBitStream, OutputBitStream};
pub use error::{HuffmanError, LogicError, Result};
pub use framing::{decode, encode, Header, SizeStatistic};
pub use frequency::{ByteFrequency, FrequencyTable};
pub use table::CodeTable;
pub use tree::{HuffmanTree, Node};
