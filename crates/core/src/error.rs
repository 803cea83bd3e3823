//! Error types for the Huffman coding engine.
//!
//! Every failure is a local, recoverable condition returned to the caller.
//! Nothing in the engine panics on bad input or mutates global state.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Huffman: code construction, encode or decode failures
/// - Framing: container serialization/parsing
/// - CRC: corrupted container
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error (e.g., unknown symbol, truncated stream)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Container error (e.g., invalid header, length mismatch)
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// CRC validation failed, indicating data corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// A declared bit length does not fit the backing bytes
    #[error("bit length {bit_len} does not match {byte_len} backing bytes")]
    BitLengthOutOfRange { bit_len: u64, byte_len: usize },
}

/// Huffman engine errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// No symbols presented to the tree builder
    #[error("empty input: no symbols to build a tree from")]
    EmptyInput,

    /// Encoder asked to encode a byte that has no codeword
    #[error("symbol {symbol:#04x} at position {position} has no codeword")]
    UnknownSymbol { symbol: u8, position: usize },

    /// Symbol counts whose sum does not fit in a `u64`
    #[error("symbol weights overflow u64")]
    WeightOverflow,

    /// Decoder ran out of bits in the middle of a codeword
    #[error("truncated stream: {pending_bits} trailing bits of {bit_len} match no codeword")]
    TruncatedStream { bit_len: usize, pending_bits: usize },

    /// A loaded code table is not a valid prefix-free code
    #[error("corrupt code table: {0}")]
    CorruptTable(#[from] TableDefect),

    /// Codeword length outside the persistable range 1..=255
    #[error("code length {length} exceeds maximum 255")]
    CodeLengthTooLong { length: usize },

    /// Decoded length doesn't match the length recorded with the stream
    #[error("decoded length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Reasons a code table fails the prefix-free sanity check.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableDefect {
    #[error("symbol {symbol:#04x} has an empty codeword")]
    EmptyCodeword { symbol: u8 },

    #[error("symbol {symbol:#04x} appears more than once")]
    DuplicateSymbol { symbol: u8 },

    /// The codeword of `prefix` is a prefix of (or equal to) the codeword of `symbol`
    #[error("codeword of {prefix:#04x} is a prefix of the codeword of {symbol:#04x}")]
    PrefixConflict { prefix: u8, symbol: u8 },
}

/// Container framing errors.
#[derive(Debug, Error)]
pub enum FramingError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Buffer is too short to contain what the header promises
    #[error("frame too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// A section's length doesn't match what the header specifies
    #[error("{section} length mismatch: header says {expected}, got {actual}")]
    LengthMismatch {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Text listing could not be parsed
    #[error("malformed listing at line {line}: {reason}")]
    MalformedListing { line: usize, reason: String },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
