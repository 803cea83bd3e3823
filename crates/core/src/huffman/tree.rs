//! Huffman tree construction by repeated merge of the two smallest weights.
//!
//! The working set is a `Vec` kept in descending weight order, so the two
//! smallest nodes are always the last two elements. A merged node is put back
//! with a linear scan: it goes immediately before the first node with a
//! strictly smaller weight, or at the end if there is none. Ties therefore
//! keep earlier nodes ahead of the newly merged one, which makes the output
//! fully determined by the input counts.

use tracing::{debug, trace};

use super::frequency::{FrequencyTable, Symbol};
use crate::error::{HuffmanError, Result};

/// A node of the Huffman tree.
///
/// Internal nodes own their children exclusively; the edge to `zero` carries
/// bit `0` and the edge to `one` carries bit `1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(Symbol),
    Internal {
        weight: u64,
        zero: Box<Node>,
        one: Box<Node>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf(symbol) => symbol.count,
            Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Combine the node removed first (`first`) with the node removed second.
    ///
    /// The strictly lighter child gets bit `0`. On equal weight `first` gets
    /// `0` and `second` gets `1`, so reruns label identically.
    fn merge(first: Node, second: Node) -> Node {
        let weight = first.weight() + second.weight();
        let (zero, one) = if second.weight() < first.weight() {
            (second, first)
        } else {
            (first, second)
        };
        Node::Internal {
            weight,
            zero: Box::new(zero),
            one: Box::new(one),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Internal { zero, one, .. } => zero.leaf_count() + one.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Internal { zero, one, .. } => 1 + zero.depth().max(one.depth()),
        }
    }
}

/// A finished Huffman tree with exactly one leaf per distinct symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build the tree for every symbol present in `freqs`.
    ///
    /// # Errors
    /// `HuffmanError::EmptyInput` if `freqs` has no symbols.
    pub fn build(freqs: &FrequencyTable) -> Result<Self> {
        Self::from_symbols(freqs.by_descending_weight())
    }

    /// Build the tree from symbols already sorted by descending count.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyInput` if `symbols` is empty
    /// - `HuffmanError::WeightOverflow` if the counts sum past `u64::MAX`
    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self> {
        debug_assert!(symbols.windows(2).all(|w| w[0].count >= w[1].count));
        // every merged weight is at most the sum of all leaves
        symbols
            .iter()
            .try_fold(0u64, |sum, s| sum.checked_add(s.count))
            .ok_or(HuffmanError::WeightOverflow)?;

        let mut tops: Vec<Node> = symbols.into_iter().map(Node::Leaf).collect();
        debug!(leaves = tops.len(), "building huffman tree");

        let root = loop {
            let first = tops.pop().ok_or(HuffmanError::EmptyInput)?;
            let Some(second) = tops.pop() else {
                break first;
            };
            trace!(
                first = first.weight(),
                second = second.weight(),
                "merging two smallest nodes"
            );
            let merged = Node::merge(first, second);
            let at = tops
                .iter()
                .position(|node| node.weight() < merged.weight())
                .unwrap_or(tops.len());
            tops.insert(at, merged);
        };

        debug!(weight = root.weight(), depth = root.depth(), "huffman tree built");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Total weight of the tree, i.e. the number of input symbols.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn leaf(byte: u8, node: &Node) -> bool {
        matches!(node, Node::Leaf(s) if s.byte == byte)
    }

    #[test]
    fn test_empty_is_rejected() {
        let freqs = FrequencyTable::from_bytes(b"");
        assert!(matches!(
            HuffmanTree::build(&freqs),
            Err(Error::Huffman(HuffmanError::EmptyInput))
        ));
    }

    #[test]
    fn test_single_symbol_root_is_leaf() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"aaaa")).unwrap();
        assert!(tree.root().is_leaf());
        assert_eq!(tree.weight(), 4);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_merge_order_for_skewed_counts() {
        // a:5 b:2 c:1 d:1 merges c+d, then (cd)+b, then with a
        let freqs =
            FrequencyTable::from_counts([(b'a', 5), (b'b', 2), (b'c', 1), (b'd', 1)]).unwrap();
        let tree = HuffmanTree::build(&freqs).unwrap();
        assert_eq!(tree.weight(), 9);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.depth(), 3);

        let Node::Internal { zero, one, weight } = tree.root() else {
            panic!("root must be internal");
        };
        assert_eq!(*weight, 9);
        assert!(leaf(b'a', one));
        assert_eq!(zero.weight(), 4);

        let Node::Internal { zero, one, .. } = &**zero else {
            panic!("expected internal node of weight 4");
        };
        // equal weights: the merged (c,d) node was removed first
        assert_eq!(zero.weight(), 2);
        assert!(leaf(b'b', one));

        let Node::Internal { zero, one, .. } = &**zero else {
            panic!("expected internal node of weight 2");
        };
        assert!(leaf(b'd', zero));
        assert!(leaf(b'c', one));
    }

    #[test]
    fn test_merged_node_goes_behind_equal_weights() {
        // after merging c+d (2) the working set is [a:3, b:2, cd:2]
        let freqs =
            FrequencyTable::from_counts([(b'a', 3), (b'b', 2), (b'c', 1), (b'd', 1)]).unwrap();
        let tree = HuffmanTree::build(&freqs).unwrap();
        let Node::Internal { zero, one, .. } = tree.root() else {
            panic!("root must be internal");
        };
        // cd (2) + b (2) = 4 outweighs a (3)
        assert!(leaf(b'a', zero));
        assert_eq!(one.weight(), 4);
    }

    #[test]
    fn test_overflowing_weights_are_rejected() {
        let symbols = vec![
            Symbol { byte: b'a', count: u64::MAX },
            Symbol { byte: b'b', count: 1 },
        ];
        assert!(matches!(
            HuffmanTree::from_symbols(symbols),
            Err(Error::Huffman(HuffmanError::WeightOverflow))
        ));

        let symbols = vec![
            Symbol { byte: b'a', count: u64::MAX - 1 },
            Symbol { byte: b'b', count: 1 },
        ];
        assert_eq!(HuffmanTree::from_symbols(symbols).unwrap().weight(), u64::MAX);
    }

    #[test]
    fn test_lighter_child_gets_zero() {
        let node = Node::merge(
            Node::Leaf(Symbol { byte: 1, count: 7 }),
            Node::Leaf(Symbol { byte: 2, count: 3 }),
        );
        let Node::Internal { zero, one, weight } = node else {
            panic!("merge must produce an internal node");
        };
        assert_eq!(weight, 10);
        assert!(leaf(2, &zero));
        assert!(leaf(1, &one));
    }

    #[test]
    fn test_every_symbol_is_a_leaf() {
        let data: Vec<u8> = (0..=255u8).collect();
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        assert_eq!(tree.leaf_count(), 256);
        // uniform weights give a perfectly balanced tree
        assert_eq!(tree.depth(), 8);
    }
}
