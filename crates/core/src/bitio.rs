//! Bit-level I/O for codewords and encoded streams.
//!
//! Both the writer and the reader work MSB-first: the first bit written lands
//! in the most significant bit of the first byte.
//!
//! # Padding Rules
//! - `BitWriter` pads the final partial byte with zeros and reports the exact
//!   number of bits written, so padding is never mistaken for data.
//! - `BitReader` can be limited to an exact bit length; reads past that limit
//!   fail even when padding bits are physically present.
//!
//! # Example
//! ```
//! use huffman_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.extend_bits([true, false, true]);
//! writer.write_bit(true);
//! let (bytes, bit_len) = writer.finish_with_len();
//! assert_eq!(bytes, vec![0b1011_0000]);
//! assert_eq!(bit_len, 4);
//!
//! let mut reader = BitReader::with_bit_len(&bytes, bit_len).unwrap();
//! assert!(reader.read_bit().unwrap());
//! assert_eq!(reader.by_ref().collect::<Vec<_>>(), vec![false, true, true]);
//! assert!(reader.read_bit().is_err());
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a writer whose output buffer can hold `bytes` bytes without reallocating.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Append every bit yielded by `bits`.
    pub fn extend_bits<I: IntoIterator<Item = bool>>(&mut self, bits: I) {
        for bit in bits {
            self.write_bit(bit);
        }
    }

    /// Finish writing and return the output bytes, zero padded to a byte boundary.
    pub fn finish(self) -> Vec<u8> {
        self.finish_with_len().0
    }

    /// Finish writing and return the padded bytes together with the exact bit length.
    pub fn finish_with_len(mut self) -> (Vec<u8>, usize) {
        let bit_len = self.bit_len();
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        (self.bytes, bit_len)
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer, up to a fixed bit length.
///
/// # Invariants
/// - `bit_position <= bit_len <= data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Number of valid bits in `data`; anything after is padding
    bit_len: usize,
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over every bit of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_len: data.len() * 8,
            bit_position: 0,
        }
    }

    /// Create a reader that stops after `bit_len` bits.
    ///
    /// # Errors
    /// `BitIoError::BitLengthOutOfRange` if `data` holds fewer than `bit_len` bits.
    pub fn with_bit_len(data: &'a [u8], bit_len: usize) -> Result<Self> {
        if bit_len > data.len() * 8 {
            return Err(BitIoError::BitLengthOutOfRange {
                bit_len: bit_len as u64,
                byte_len: data.len(),
            }
            .into());
        }
        Ok(Self {
            data,
            bit_len,
            bit_position: 0,
        })
    }

    /// Stop after `bit_len` bits, or at the end of the data if that comes first.
    pub fn limit(mut self, bit_len: usize) -> Self {
        self.bit_len = bit_len.min(self.data.len() * 8);
        self.bit_position = self.bit_position.min(self.bit_len);
        self
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once `bit_len` bits have been consumed.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_position >= self.bit_len {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let byte = self.data[self.bit_position / 8];
        let bit = (byte >> (7 - self.bit_position % 8)) & 1 == 1;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Return the number of valid bits not yet read.
    pub fn bits_remaining(&self) -> usize {
        self.bit_len - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_len
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits_remaining();
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn bits(text: &str) -> Vec<bool> {
        text.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_write_read_full_byte() {
        let mut writer = BitWriter::new();
        writer.extend_bits(bits("10111000"));

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10111000]);

        let reader = BitReader::new(&bytes);
        assert_eq!(reader.collect::<Vec<_>>(), bits("10111000"));
    }

    #[test]
    fn test_padding_is_reported() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        assert_eq!(writer.bit_len(), 1);

        let (bytes, bit_len) = writer.finish_with_len();
        assert_eq!(bytes, vec![0b10000000]);
        assert_eq!(bit_len, 1);
    }

    #[test]
    fn test_bit_len_limits_reads() {
        let data = [0b1010_0000];
        let mut reader = BitReader::with_bit_len(&data, 3).unwrap();
        assert_eq!(reader.bits_remaining(), 3);
        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.read_bit().unwrap());
        assert!(reader.is_empty());
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_bit_len_out_of_range() {
        let data = [0u8; 2];
        assert!(matches!(
            BitReader::with_bit_len(&data, 17),
            Err(Error::BitIo(BitIoError::BitLengthOutOfRange { bit_len: 17, byte_len: 2 }))
        ));
    }

    #[test]
    fn test_multi_byte() {
        let mut writer = BitWriter::new();
        writer.extend_bits(bits("1010101111110000"));

        let bytes = writer.finish();
        assert_eq!(bytes, vec![0b10101011, 0b11110000]);

        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.bits_remaining(), 16);
        for _ in 0..9 {
            reader.read_bit().unwrap();
        }
        assert_eq!(reader.position(), 9);
        assert_eq!(reader.collect::<Vec<_>>(), bits("1110000"));
    }

    #[test]
    fn test_limit_clamps_to_data() {
        let data = [0b1100_0000];
        let reader = BitReader::new(&data).limit(2);
        assert_eq!(reader.collect::<Vec<_>>(), bits("11"));

        let reader = BitReader::new(&data).limit(100);
        assert_eq!(reader.bits_remaining(), 8);
    }

    #[test]
    fn test_iterator_yields_exact_bits() {
        let mut writer = BitWriter::new();
        writer.extend_bits([true, false, true, true, false, false, true, false, true]);
        let (bytes, bit_len) = writer.finish_with_len();
        assert_eq!(bytes, vec![0b10110010, 0b10000000]);

        let reader = BitReader::with_bit_len(&bytes, bit_len).unwrap();
        assert_eq!(reader.size_hint(), (9, Some(9)));
        let bits: Vec<bool> = reader.collect();
        assert_eq!(
            bits,
            vec![true, false, true, true, false, false, true, false, true]
        );
    }
}
