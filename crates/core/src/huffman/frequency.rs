//! Symbol frequency analysis.

use crate::error::{HuffmanError, Result};

/// One distinct byte value and how often it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub byte: u8,
    pub count: u64,
}

impl Symbol {
    /// Occurrence count normalized by `total`; 0.0 for an empty input.
    pub fn probability(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            self.count as f64 / total as f64
        }
    }
}

/// Occurrence counts for every byte value, plus the total symbol count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl FrequencyTable {
    /// Count every byte of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in bytes {
            counts[byte as usize] += 1;
        }
        Self {
            counts,
            total: bytes.len() as u64,
        }
    }

    /// Build a table from explicit `(byte, count)` pairs; later pairs add to earlier ones.
    ///
    /// # Errors
    /// `HuffmanError::WeightOverflow` if the counts sum past `u64::MAX`. The
    /// total bounds every tree weight, so a table that loads can be built.
    pub fn from_counts<I: IntoIterator<Item = (u8, u64)>>(pairs: I) -> Result<Self> {
        let mut counts = [0u64; 256];
        let mut total = 0u64;
        for (byte, count) in pairs {
            total = total.checked_add(count).ok_or(HuffmanError::WeightOverflow)?;
            // bounded by total
            counts[byte as usize] += count;
        }
        Ok(Self { counts, total })
    }

    pub fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct byte values present.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Symbols present in the input, in ascending byte order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| Symbol {
                byte: byte as u8,
                count,
            })
    }

    /// Symbols ordered by descending count, ties broken by ascending byte value.
    pub fn by_descending_weight(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.symbols().collect();
        // stable: equal counts keep ascending byte order
        symbols.sort_by(|a, b| b.count.cmp(&a.count));
        symbols
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_counts_and_total() {
        let freqs = FrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(freqs.total(), 11);
        assert_eq!(freqs.distinct(), 5);
        assert_eq!(freqs.count(b'a'), 5);
        assert_eq!(freqs.count(b'b'), 2);
        assert_eq!(freqs.count(b'r'), 2);
        assert_eq!(freqs.count(b'c'), 1);
        assert_eq!(freqs.count(b'd'), 1);
        assert_eq!(freqs.count(b'z'), 0);
    }

    #[test]
    fn test_empty_input() {
        let freqs = FrequencyTable::from_bytes(b"");
        assert!(freqs.is_empty());
        assert_eq!(freqs.distinct(), 0);
        assert_eq!(freqs.symbols().count(), 0);
    }

    #[test]
    fn test_descending_order_with_ties() {
        let freqs =
            FrequencyTable::from_counts([(b'd', 1), (b'b', 2), (b'c', 1), (b'a', 5)]).unwrap();
        let order: Vec<u8> = freqs.by_descending_weight().iter().map(|s| s.byte).collect();
        assert_eq!(order, b"abcd".to_vec());
    }

    #[test]
    fn test_repeated_pairs_accumulate() {
        let freqs = FrequencyTable::from_counts([(b'a', 2), (b'b', 1), (b'a', 3)]).unwrap();
        assert_eq!(freqs.count(b'a'), 5);
        assert_eq!(freqs.total(), 6);
    }

    #[test]
    fn test_count_overflow_is_rejected() {
        assert!(matches!(
            FrequencyTable::from_counts([(b'a', u64::MAX), (b'b', 1)]),
            Err(Error::Huffman(HuffmanError::WeightOverflow))
        ));
        assert!(matches!(
            FrequencyTable::from_counts([(b'a', u64::MAX), (b'a', 1)]),
            Err(Error::Huffman(HuffmanError::WeightOverflow))
        ));
        let full = FrequencyTable::from_counts([(b'a', u64::MAX - 1), (b'b', 1)]).unwrap();
        assert_eq!(full.total(), u64::MAX);
    }

    #[test]
    fn test_probability() {
        let freqs = FrequencyTable::from_bytes(b"aaab");
        let a = freqs.symbols().next().unwrap();
        assert_eq!(a.probability(freqs.total()), 0.75);
        assert_eq!(a.probability(0), 0.0);
    }
}
