//! Encoding bytes into a bit stream with a code table.

use tracing::debug;

use super::code::CodeTable;
use crate::bitio::{BitReader, BitWriter};
use crate::error::{BitIoError, HuffmanError, Result};

/// Concatenated codewords, packed MSB-first, with the exact bit length.
///
/// The final byte is zero padded; `bit_len` says where the data ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedStream {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl EncodedStream {
    /// Wrap packed bytes holding `bit_len` valid bits.
    ///
    /// # Errors
    /// `BitIoError::BitLengthOutOfRange` unless `bytes` is exactly
    /// `ceil(bit_len / 8)` bytes long.
    pub fn from_parts(bytes: Vec<u8>, bit_len: usize) -> Result<Self> {
        if bytes.len() != bit_len.div_ceil(8) {
            return Err(BitIoError::BitLengthOutOfRange {
                bit_len: bit_len as u64,
                byte_len: bytes.len(),
            }
            .into());
        }
        Ok(Self { bytes, bit_len })
    }

    /// Build a stream from individual bits.
    pub fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        let mut writer = BitWriter::new();
        writer.extend_bits(bits);
        let (bytes, bit_len) = writer.finish_with_len();
        Self { bytes, bit_len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// Iterate over the valid bits, skipping padding.
    pub fn bits(&self) -> BitReader<'_> {
        debug_assert_eq!(self.bytes.len(), self.bit_len.div_ceil(8));
        BitReader::new(&self.bytes).limit(self.bit_len)
    }

    /// The first `bit_len` bits of this stream.
    pub fn truncated(&self, bit_len: usize) -> Self {
        Self::from_bits(self.bits().take(bit_len))
    }

    /// Render as a string of `0`/`1` characters.
    pub fn to_bit_string(&self) -> String {
        self.bits().map(|b| if b { '1' } else { '0' }).collect()
    }
}

/// Encode `data` by concatenating the codeword of every byte, in order.
///
/// # Errors
/// `HuffmanError::UnknownSymbol` for the first byte with no table entry.
pub fn encode(data: &[u8], table: &CodeTable) -> Result<EncodedStream> {
    let mut writer = BitWriter::with_capacity(data.len() / 2);
    for (position, &symbol) in data.iter().enumerate() {
        let code = table
            .get(symbol)
            .ok_or(HuffmanError::UnknownSymbol { symbol, position })?;
        writer.extend_bits(code.bits().iter().copied());
    }
    let (bytes, bit_len) = writer.finish_with_len();
    debug!(input_bytes = data.len(), bit_len, "encoded stream");
    Ok(EncodedStream { bytes, bit_len })
}
