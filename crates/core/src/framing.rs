//! Binary container: a code table and an encoded stream in one buffer.
//!
//! The table is stored verbatim so a decoder never has to rebuild the tree,
//! and the exact bit length is stored so the zero padding at the end of the
//! payload can't be read as data.
//!
//! # Container Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x55 0x46 0x43 ("HUFC")
//! +------------------+
//! | raw_len (4)      |  u32 original uncompressed size
//! +------------------+
//! | table_len (4)    |  u32 length of the code table metadata
//! +------------------+
//! | bit_len (8)      |  u64 number of valid payload bits
//! +------------------+
//! | crc32 (4)        |  u32 checksum of everything after the magic
//! +------------------+
//! | code table       |  see `CodeTable::serialize_metadata`
//! | (variable)       |
//! +------------------+
//! | payload          |  ceil(bit_len / 8) bytes, MSB-first
//! | (variable)       |
//! +------------------+
//! ```
//!
//! All integers are little-endian. The CRC32 covers raw_len, table_len,
//! bit_len, the table metadata and the payload.

use tracing::debug;

use crate::error::{Error, FramingError, HuffmanError, Result};
use crate::huffman::{self, CodeTable, EncodedStream};

/// Magic number for containers: "HUFC"
const MAGIC: [u8; 4] = [0x48, 0x55, 0x46, 0x43];

/// Size of the container header in bytes
pub const HEADER_SIZE: usize = 24;

/// A parsed container.
#[derive(Debug, Clone)]
pub struct Container {
    /// Original uncompressed data length
    pub raw_len: u32,

    /// Code table, loaded verbatim and checked for prefix freedom
    pub table: CodeTable,

    /// Encoded bits
    pub stream: EncodedStream,

    pub crc32: u32,
}

/// Serialize a code table and encoded stream for storage.
///
/// `raw_len` is the length of the data that was encoded, checked on decompression.
pub fn serialize_container(raw_len: u32, table: &CodeTable, stream: &EncodedStream) -> Vec<u8> {
    let metadata = table.serialize_metadata();
    let table_len = metadata.len() as u32;
    let bit_len = stream.bit_len() as u64;
    let payload = stream.as_bytes();

    let crc32 = compute_crc(raw_len, table_len, bit_len, &metadata, payload);

    let mut out = Vec::with_capacity(HEADER_SIZE + metadata.len() + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&raw_len.to_le_bytes());
    out.extend_from_slice(&table_len.to_le_bytes());
    out.extend_from_slice(&bit_len.to_le_bytes());
    out.extend_from_slice(&crc32.to_le_bytes());
    out.extend_from_slice(&metadata);
    out.extend_from_slice(payload);
    out
}

/// Parse a container.
///
/// # Errors
/// - `FramingError::InvalidMagic` if the magic number doesn't match
/// - `FramingError::FrameTooShort` / `LengthMismatch` if sizes disagree with the header
/// - `Error::Crc` if the checksum fails
/// - `HuffmanError::CorruptTable` if the stored table is not prefix-free
pub fn parse_container(bytes: &[u8]) -> Result<Container> {
    if bytes.len() < HEADER_SIZE {
        return Err(FramingError::FrameTooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    }

    let magic = array::<4>(bytes, 0);
    if magic != MAGIC {
        return Err(FramingError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let raw_len = u32::from_le_bytes(array(bytes, 4));
    let table_len = u32::from_le_bytes(array(bytes, 8));
    let bit_len = u64::from_le_bytes(array(bytes, 12));
    let crc32 = u32::from_le_bytes(array(bytes, 20));

    let table_end = HEADER_SIZE + table_len as usize;
    if bytes.len() < table_end {
        return Err(FramingError::FrameTooShort {
            required: table_end,
            actual: bytes.len(),
        }
        .into());
    }
    let metadata = &bytes[HEADER_SIZE..table_end];
    let payload = &bytes[table_end..];

    let payload_len = usize::try_from(bit_len.div_ceil(8)).unwrap_or(usize::MAX);
    if payload.len() != payload_len {
        return Err(FramingError::LengthMismatch {
            section: "payload",
            expected: payload_len,
            actual: payload.len(),
        }
        .into());
    }

    let computed = compute_crc(raw_len, table_len, bit_len, metadata, payload);
    if computed != crc32 {
        return Err(Error::Crc {
            expected: crc32,
            actual: computed,
        });
    }

    let table = CodeTable::deserialize_metadata(metadata)?;
    let stream = EncodedStream::from_parts(payload.to_vec(), bit_len as usize)?;

    Ok(Container {
        raw_len,
        table,
        stream,
        crc32,
    })
}

fn array<const N: usize>(bytes: &[u8], at: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[at..at + N]);
    out
}

fn compute_crc(raw_len: u32, table_len: u32, bit_len: u64, metadata: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&raw_len.to_le_bytes());
    hasher.update(&table_len.to_le_bytes());
    hasher.update(&bit_len.to_le_bytes());
    hasher.update(metadata);
    hasher.update(payload);
    hasher.finalize()
}

/// Build the code for `raw_data`, encode it, and serialize the container.
///
/// # Errors
/// `FramingError::LengthMismatch` if `raw_data` is longer than `u32::MAX` bytes.
pub fn compress(raw_data: &[u8]) -> Result<Vec<u8>> {
    let raw_len = u32::try_from(raw_data.len()).map_err(|_| FramingError::LengthMismatch {
        section: "input",
        expected: u32::MAX as usize,
        actual: raw_data.len(),
    })?;
    let table = huffman::build_code(raw_data)?;
    let stream = huffman::encode(raw_data, &table)?;
    let container = serialize_container(raw_len, &table, &stream);
    debug!(
        raw_len,
        container_len = container.len(),
        "compressed into container"
    );
    Ok(container)
}

/// Decode a parsed container back into the original bytes.
///
/// # Errors
/// `HuffmanError::LengthMismatch` if the decoded length differs from `raw_len`.
pub fn decompress(container: &Container) -> Result<Vec<u8>> {
    let data = huffman::decode(&container.stream, &container.table)?;
    if data.len() != container.raw_len as usize {
        return Err(HuffmanError::LengthMismatch {
            expected: container.raw_len as usize,
            actual: data.len(),
        }
        .into());
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::Codeword;

    #[test]
    fn test_serialize_parse_round_trip() {
        let raw_data = b"hello world! this is a test.";
        let bytes = compress(raw_data).unwrap();

        let container = parse_container(&bytes).unwrap();
        assert_eq!(container.raw_len, raw_data.len() as u32);
        assert_eq!(container.table, huffman::build_code(raw_data).unwrap());

        assert_eq!(decompress(&container).unwrap(), raw_data);
    }

    #[test]
    fn test_header_layout() {
        let table = CodeTable::from_entries([(b'a', Codeword::parse("0").unwrap())]).unwrap();
        let stream = huffman::encode(b"aaa", &table).unwrap();
        let bytes = serialize_container(3, &table, &stream);

        assert_eq!(&bytes[0..4], b"HUFC");
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
        // entry count (2) + symbol + length + one packed byte
        assert_eq!(&bytes[8..12], &5u32.to_le_bytes());
        assert_eq!(&bytes[12..20], &3u64.to_le_bytes());
        assert_eq!(&bytes[HEADER_SIZE..], &[1, 0, b'a', 1, 0x00, 0x00]);
    }

    #[test]
    fn test_invalid_magic() {
        let mut bytes = compress(b"abc").unwrap();
        bytes[0] = 0xFF;
        assert!(matches!(
            parse_container(&bytes),
            Err(Error::Framing(FramingError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_frame_too_short() {
        assert!(matches!(
            parse_container(&[0u8; 10]),
            Err(Error::Framing(FramingError::FrameTooShort { .. }))
        ));
    }

    #[test]
    fn test_payload_length_mismatch() {
        let mut bytes = compress(b"some bytes").unwrap();
        bytes.push(0);
        assert!(matches!(
            parse_container(&bytes),
            Err(Error::Framing(FramingError::LengthMismatch {
                section: "payload",
                ..
            }))
        ));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut bytes = compress(b"test data").unwrap();
        let len = bytes.len();
        bytes[len - 1] ^= 0x01;
        assert!(matches!(parse_container(&bytes), Err(Error::Crc { .. })));
    }

    #[test]
    fn test_corrupt_table_with_valid_crc() {
        let table = CodeTable::from_entries([
            (b'a', Codeword::parse("0").unwrap()),
            (b'b', Codeword::parse("1").unwrap()),
        ])
        .unwrap();
        let stream = huffman::encode(b"ab", &table).unwrap();
        let mut bytes = serialize_container(2, &table, &stream);

        // rewrite b's codeword to 0 and fix up the checksum
        let b_code = HEADER_SIZE + 2 + 3 + 2;
        bytes[b_code] = 0x00;
        let (table_bytes, payload) = bytes[HEADER_SIZE..].split_at(8);
        let crc = compute_crc(2, 8, 2, table_bytes, payload);
        bytes[20..24].copy_from_slice(&crc.to_le_bytes());

        assert!(matches!(
            parse_container(&bytes),
            Err(Error::Huffman(HuffmanError::CorruptTable(_)))
        ));
    }

    #[test]
    fn test_raw_len_mismatch() {
        let table = huffman::build_code(b"abab").unwrap();
        let stream = huffman::encode(b"abab", &table).unwrap();
        let bytes = serialize_container(5, &table, &stream);
        let container = parse_container(&bytes).unwrap();
        assert!(matches!(
            decompress(&container),
            Err(Error::Huffman(HuffmanError::LengthMismatch {
                expected: 5,
                actual: 4
            }))
        ));
    }

    #[test]
    fn test_empty_data() {
        let bytes = compress(b"").unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 2);

        let container = parse_container(&bytes).unwrap();
        assert!(container.table.is_empty());
        assert!(decompress(&container).unwrap().is_empty());
    }

    #[test]
    fn test_single_byte() {
        let container = parse_container(&compress(b"A").unwrap()).unwrap();
        assert_eq!(container.stream.bit_len(), 1);
        assert_eq!(decompress(&container).unwrap(), b"A");
    }

    #[test]
    fn test_large_single_symbol_input() {
        let raw_data = vec![b'X'; 65536];
        let bytes = compress(&raw_data).unwrap();
        // one bit per byte
        assert_eq!(bytes.len(), HEADER_SIZE + 5 + 65536 / 8);

        let container = parse_container(&bytes).unwrap();
        assert_eq!(decompress(&container).unwrap(), raw_data);
    }
}
