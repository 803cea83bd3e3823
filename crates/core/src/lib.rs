//! huffman-core: static Huffman coding engine
//!
//! This library derives an optimal prefix code from the byte frequencies of an
//! input and uses it to encode and decode that input:
//! - Counts symbol frequencies
//! - Builds the Huffman tree by repeatedly merging the two lightest nodes
//! - Assigns codewords from root-to-leaf paths
//! - Encodes bytes to a bit stream and decodes it back with the code table
//!
//! # Architecture
//!
//! - `bitio`: Low-level bit reading/writing
//! - `huffman`: Frequency analysis, tree building, code assignment, encode/decode
//! - `framing`: Binary container holding a code table and encoded stream
//! - `listing`: Text form of the same, one codeword per line
//! - `metrics`: Code length, entropy and size statistics
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Deterministic**: Identical input always yields an identical code
//! - **Re-entrant**: No shared mutable state; every call owns its tree and table
//!
//! # Example
//!
//! ```
//! use huffman_core::{build_code, decode, encode};
//!
//! let table = build_code(b"aaaabbc").unwrap();
//! assert_eq!(table.get(b'a').map(|c| c.len()), Some(1));
//!
//! let stream = encode(b"abc", &table).unwrap();
//! assert_eq!(decode(&stream, &table).unwrap(), b"abc");
//! ```

pub mod bitio;
pub mod error;
pub mod framing;
pub mod huffman;
pub mod listing;
pub mod metrics;

// Re-export commonly used types
pub use error::{Error, Result};
pub use huffman::{build_code, decode, encode, CodeTable, Codeword, EncodedStream};
