//! Decoding a bit stream with a recovered code table.
//!
//! The table is turned into a binary trie stored in a flat arena and walked
//! bit by bit. This gives the same output as comparing an accumulated bit
//! string against every codeword after each bit, without the per-bit scan.

use tracing::debug;

use super::code::CodeTable;
use super::encoder::EncodedStream;
use crate::error::{HuffmanError, Result, TableDefect};

const ROOT: usize = 0;

#[derive(Debug, Clone, Default)]
struct TrieNode {
    /// Arena index of the child reached by bit 0 / bit 1
    children: [Option<usize>; 2],
    symbol: Option<u8>,
}

/// Bit-by-bit decoder for one code table.
#[derive(Debug, Clone)]
pub struct Decoder {
    nodes: Vec<TrieNode>,
}

impl Decoder {
    /// Build the decoding trie for `table`.
    ///
    /// # Errors
    /// `HuffmanError::CorruptTable` if the table is not prefix-free. Tables
    /// from [`CodeTable::from_entries`] have already passed this check.
    pub fn new(table: &CodeTable) -> Result<Self> {
        let mut nodes = vec![TrieNode::default()];
        let mut owner: Vec<Option<u8>> = vec![None];

        for (symbol, code) in table.iter() {
            if code.is_empty() {
                return Err(HuffmanError::from(TableDefect::EmptyCodeword { symbol }).into());
            }
            let mut at = ROOT;
            for &bit in code.bits() {
                if let Some(prefix) = nodes[at].symbol {
                    return Err(conflict(prefix, symbol));
                }
                let child = nodes[at].children[bit as usize];
                at = match child {
                    Some(next) => next,
                    None => {
                        nodes.push(TrieNode::default());
                        owner.push(Some(symbol));
                        let next = nodes.len() - 1;
                        nodes[at].children[bit as usize] = Some(next);
                        next
                    }
                };
            }
            if let Some(prefix) = nodes[at].symbol {
                return Err(conflict(prefix, symbol));
            }
            if nodes[at].children.iter().any(Option::is_some) {
                // some earlier, longer codeword runs through this node
                let longer = owner[at].unwrap_or(symbol);
                return Err(conflict(symbol, longer));
            }
            nodes[at].symbol = Some(symbol);
        }

        Ok(Self { nodes })
    }

    /// Decode every symbol in `stream`.
    ///
    /// # Errors
    /// `HuffmanError::TruncatedStream` if the stream ends, or leaves the
    /// code's bit paths, before the pending bits complete a codeword.
    pub fn decode(&self, stream: &EncodedStream) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(stream.bit_len() / 2);
        let mut at = ROOT;
        let mut pending_bits = 0;

        for (position, bit) in stream.bits().enumerate() {
            pending_bits += 1;
            match self.nodes[at].children[bit as usize] {
                Some(next) => at = next,
                None => {
                    // no codeword continues with these bits, so the rest of
                    // the stream stays pending until it runs out
                    let codeword_start = position + 1 - pending_bits;
                    return Err(HuffmanError::TruncatedStream {
                        bit_len: stream.bit_len(),
                        pending_bits: stream.bit_len() - codeword_start,
                    }
                    .into());
                }
            }
            if let Some(symbol) = self.nodes[at].symbol {
                output.push(symbol);
                at = ROOT;
                pending_bits = 0;
            }
        }

        if pending_bits > 0 {
            return Err(HuffmanError::TruncatedStream {
                bit_len: stream.bit_len(),
                pending_bits,
            }
            .into());
        }
        debug!(bit_len = stream.bit_len(), output_bytes = output.len(), "decoded stream");
        Ok(output)
    }
}

fn conflict(prefix: u8, symbol: u8) -> crate::error::Error {
    HuffmanError::from(TableDefect::PrefixConflict { prefix, symbol }).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::huffman::code::Codeword;
    use crate::huffman::encoder::encode;

    fn table(entries: &[(u8, &str)]) -> CodeTable {
        CodeTable::from_entries(
            entries
                .iter()
                .map(|&(s, c)| (s, Codeword::parse(c).unwrap())),
        )
        .unwrap()
    }

    fn bits(text: &str) -> EncodedStream {
        EncodedStream::from_bits(text.chars().map(|c| c == '1'))
    }

    #[test]
    fn test_decode_concrete_codes() {
        let t = table(&[(b'a', "1"), (b'b', "01"), (b'c', "001"), (b'd', "000")]);
        let decoder = Decoder::new(&t).unwrap();
        assert_eq!(decoder.decode(&bits("101001000")).unwrap(), b"abcd");
        assert_eq!(decoder.decode(&bits("000111")).unwrap(), b"daaa");
    }

    #[test]
    fn test_empty_stream() {
        let decoder = Decoder::new(&CodeTable::default()).unwrap();
        assert!(decoder.decode(&EncodedStream::default()).unwrap().is_empty());
    }

    #[test]
    fn test_bits_with_empty_table_are_truncated() {
        let decoder = Decoder::new(&CodeTable::default()).unwrap();
        assert!(matches!(
            decoder.decode(&bits("01")),
            Err(Error::Huffman(HuffmanError::TruncatedStream { bit_len: 2, .. }))
        ));
    }

    #[test]
    fn test_truncated_mid_codeword() {
        let t = table(&[(b'a', "1"), (b'b', "01"), (b'c', "001"), (b'd', "000")]);
        let decoder = Decoder::new(&t).unwrap();
        let stream = encode(b"abcd", &t).unwrap();
        // drop the last bit of d's codeword
        let cut = stream.truncated(stream.bit_len() - 1);
        assert!(matches!(
            decoder.decode(&cut),
            Err(Error::Huffman(HuffmanError::TruncatedStream {
                bit_len: 8,
                pending_bits: 2
            }))
        ));
    }

    #[test]
    fn test_dead_path_in_incomplete_code() {
        // single-symbol code: bit 1 leads nowhere
        let t = table(&[(b'a', "0")]);
        let decoder = Decoder::new(&t).unwrap();
        assert_eq!(decoder.decode(&bits("000")).unwrap(), b"aaa");
        assert!(matches!(
            decoder.decode(&bits("0010")),
            Err(Error::Huffman(HuffmanError::TruncatedStream {
                bit_len: 4,
                pending_bits: 2
            }))
        ));
    }

    #[test]
    fn test_matches_linear_scan() {
        let t = table(&[(b'x', "00"), (b'y', "01"), (b'z', "1")]);
        let decoder = Decoder::new(&t).unwrap();
        let stream = bits("1000110011");

        // accumulate bits and compare against every codeword after each one
        let mut expected = Vec::new();
        let mut accum = Vec::new();
        for bit in stream.bits() {
            accum.push(bit);
            if let Some((symbol, _)) = t.iter().find(|(_, c)| c.bits() == accum.as_slice()) {
                expected.push(symbol);
                accum.clear();
            }
        }
        assert!(accum.is_empty());
        assert_eq!(decoder.decode(&stream).unwrap(), expected);
        assert_eq!(expected, b"zxyzxzz");
    }
}
