//! Static Huffman codec.
//!
//! The pipeline runs once per input:
//! frequency analysis → tree construction → code assignment. The resulting
//! [`CodeTable`] is the only thing a decoder needs; it never rebuilds the tree.
//!
//! ```
//! use huffman_core::huffman::{build_code, decode, encode};
//!
//! let input = b"abracadabra";
//! let table = build_code(input).unwrap();
//! let stream = encode(input, &table).unwrap();
//! assert_eq!(decode(&stream, &table).unwrap(), input);
//! ```

pub mod code;
pub mod decoder;
pub mod encoder;
pub mod frequency;
pub mod tree;

use tracing::debug;

pub use code::{CodeTable, Codeword};
pub use decoder::Decoder;
pub use encoder::EncodedStream;
pub use frequency::{FrequencyTable, Symbol};
pub use tree::HuffmanTree;

use crate::error::Result;

/// Derive the Huffman code for `data`.
///
/// Empty input yields an empty table.
pub fn build_code(data: &[u8]) -> Result<CodeTable> {
    build_code_from_frequencies(&FrequencyTable::from_bytes(data))
}

/// Derive the Huffman code for an existing frequency table.
///
/// An empty frequency table yields an empty code table.
pub fn build_code_from_frequencies(freqs: &FrequencyTable) -> Result<CodeTable> {
    debug!(
        total = freqs.total(),
        distinct = freqs.distinct(),
        "building code table"
    );
    if freqs.is_empty() {
        return Ok(CodeTable::default());
    }
    let tree = HuffmanTree::build(freqs)?;
    Ok(CodeTable::from_tree(&tree))
}

/// Encode `data` with `table`.
///
/// # Errors
/// `HuffmanError::UnknownSymbol` if a byte of `data` has no codeword.
pub fn encode(data: &[u8], table: &CodeTable) -> Result<EncodedStream> {
    encoder::encode(data, table)
}

/// Decode `stream` with `table`.
///
/// # Errors
/// - `HuffmanError::TruncatedStream` if the stream ends mid-codeword
/// - `HuffmanError::CorruptTable` if `table` is not prefix-free
pub fn decode(stream: &EncodedStream, table: &CodeTable) -> Result<Vec<u8>> {
    Decoder::new(table)?.decode(stream)
}
