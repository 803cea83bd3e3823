//! Codewords and the code table derived from a Huffman tree.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::tree::{HuffmanTree, Node};
use crate::bitio::{BitReader, BitWriter};
use crate::error::{FramingError, HuffmanError, Result, TableDefect};

/// Longest codeword the persisted formats can describe.
pub const MAX_CODE_LEN: usize = 255;

/// The bit sequence assigned to one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Codeword {
    bits: Vec<bool>,
}

impl Codeword {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Parse a string of `0`/`1` characters; `None` on any other character.
    pub fn parse(text: &str) -> Option<Self> {
        text.chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()
            .map(Self::from_bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if `self` is a prefix of `other` (equal codewords count as prefixes).
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from symbol to codeword.
///
/// Tables produced by [`CodeTable::from_tree`] are prefix-free by
/// construction. Tables loaded from outside go through [`CodeTable::from_entries`],
/// which checks the same property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, Codeword>,
}

impl CodeTable {
    /// Assign codewords by walking `tree` from the root.
    ///
    /// Each recursive step extends its own copy of the path, so sibling
    /// subtrees never observe each other's bits. A tree whose root is a leaf
    /// gives its single symbol the one-bit codeword `0`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        match tree.root() {
            Node::Leaf(symbol) => {
                codes.insert(symbol.byte, Codeword::from_bits(vec![false]));
            }
            root => assign(root, Vec::new(), &mut codes),
        }
        debug!(symbols = codes.len(), "assigned codewords");
        Self { codes }
    }

    /// Load a table from `(symbol, codeword)` pairs, rejecting anything that
    /// is not a prefix-free code.
    ///
    /// # Errors
    /// - `HuffmanError::CodeLengthTooLong` for codewords longer than 255 bits
    /// - `HuffmanError::CorruptTable` for empty codewords, repeated symbols or
    ///   a codeword that is a prefix of another
    pub fn from_entries<I: IntoIterator<Item = (u8, Codeword)>>(entries: I) -> Result<Self> {
        let mut codes = BTreeMap::new();
        for (symbol, code) in entries {
            if code.is_empty() {
                return Err(HuffmanError::from(TableDefect::EmptyCodeword { symbol }).into());
            }
            if code.len() > MAX_CODE_LEN {
                return Err(HuffmanError::CodeLengthTooLong { length: code.len() }.into());
            }
            if codes.insert(symbol, code).is_some() {
                return Err(HuffmanError::from(TableDefect::DuplicateSymbol { symbol }).into());
            }
        }
        let table = Self { codes };
        table.check_prefix_free()?;
        Ok(table)
    }

    /// Verify that no codeword is a prefix of another.
    ///
    /// Sorting codewords lexicographically puts any prefix directly before
    /// some codeword it prefixes, so comparing neighbours is enough.
    pub fn check_prefix_free(&self) -> Result<()> {
        let mut sorted: Vec<(&Codeword, u8)> = self.codes.iter().map(|(&s, c)| (c, s)).collect();
        sorted.sort();
        for pair in sorted.windows(2) {
            let (shorter, prefix) = pair[0];
            let (longer, symbol) = pair[1];
            if shorter.is_prefix_of(longer) {
                let defect = TableDefect::PrefixConflict { prefix, symbol };
                return Err(HuffmanError::from(defect).into());
            }
        }
        Ok(())
    }

    pub fn get(&self, symbol: u8) -> Option<&Codeword> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Codeword)> {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// Serialize the table as codec metadata:
    /// `entry_count: u16 LE`, then per entry `symbol: u8`, `code_len: u8` and
    /// the codeword packed MSB-first into `ceil(code_len / 8)` bytes.
    pub fn serialize_metadata(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.codes.len() * 3);
        out.extend_from_slice(&(self.codes.len() as u16).to_le_bytes());
        for (&symbol, code) in &self.codes {
            out.push(symbol);
            out.push(code.len() as u8);
            let mut writer = BitWriter::with_capacity(code.len().div_ceil(8));
            writer.extend_bits(code.bits().iter().copied());
            out.extend_from_slice(&writer.finish());
        }
        out
    }

    /// Parse metadata written by [`CodeTable::serialize_metadata`].
    ///
    /// The result is checked exactly like [`CodeTable::from_entries`].
    pub fn deserialize_metadata(data: &[u8]) -> Result<Self> {
        let count_bytes: [u8; 2] = data
            .get(..2)
            .and_then(|b| b.try_into().ok())
            .ok_or(FramingError::FrameTooShort {
                required: 2,
                actual: data.len(),
            })?;
        let count = u16::from_le_bytes(count_bytes) as usize;

        let mut pos = 2;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let header = data.get(pos..pos + 2).ok_or(FramingError::FrameTooShort {
                required: pos + 2,
                actual: data.len(),
            })?;
            let (symbol, code_len) = (header[0], header[1] as usize);
            pos += 2;

            let packed_len = code_len.div_ceil(8);
            let packed = data
                .get(pos..pos + packed_len)
                .ok_or(FramingError::FrameTooShort {
                    required: pos + packed_len,
                    actual: data.len(),
                })?;
            pos += packed_len;

            let bits = BitReader::with_bit_len(packed, code_len)?.collect();
            entries.push((symbol, Codeword::from_bits(bits)));
        }

        if pos != data.len() {
            return Err(FramingError::LengthMismatch {
                section: "code table",
                expected: pos,
                actual: data.len(),
            }
            .into());
        }
        Self::from_entries(entries)
    }
}

fn assign(node: &Node, path: Vec<bool>, codes: &mut BTreeMap<u8, Codeword>) {
    match node {
        Node::Leaf(symbol) => {
            codes.insert(symbol.byte, Codeword::from_bits(path));
        }
        Node::Internal { zero, one, .. } => {
            let mut zero_path = path.clone();
            zero_path.push(false);
            assign(zero, zero_path, codes);

            let mut one_path = path;
            one_path.push(true);
            assign(one, one_path, codes);
        }
    }
}
