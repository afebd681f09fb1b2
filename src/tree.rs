//! Huffman tree nodes and the greedy merge that builds them.

use std::collections::HashMap;
use std::hash::Hash;

use derivative::Derivative;
use total_float_wrap::TotalF64;
use tracing::debug;

use crate::code::for_each_leaf;
use crate::error::{Error, Result};
use crate::queue::MinHeap;

/// A node of a Huffman tree. Leaves carry a symbol, internal nodes carry only
/// the summed weight of their two children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<Symbol> {
    Leaf {
        symbol: Symbol,
        weight: f64,
    },
    Internal {
        weight: f64,
        left: Box<Node<Symbol>>,
        right: Box<Node<Symbol>>,
    },
}

impl<Symbol> Node<Symbol> {
    pub fn new(symbol: Symbol, weight: f64) -> Self {
        Node::Leaf { symbol, weight }
    }

    pub fn from_children(left: Node<Symbol>, right: Node<Symbol>) -> Self {
        Node::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        match self {
            Node::Leaf { symbol, .. } => Some(symbol),
            Node::Internal { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&Node<Symbol>> {
        match self {
            Node::Internal { left, .. } => Some(left),
            Node::Leaf { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&Node<Symbol>> {
        match self {
            Node::Internal { right, .. } => Some(right),
            Node::Leaf { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// Queue entry. Ordered by weight, then by `seq`: the enumeration index for
/// leaves, `alphabet size + merge number` for merged nodes.
#[derive(Debug, Clone, Derivative)]
#[derivative(
    PartialEq(bound = ""),
    Eq(bound = ""),
    PartialOrd(bound = ""),
    Ord(bound = "")
)]
struct Ranked<Symbol> {
    weight: TotalF64,
    seq: usize,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: Node<Symbol>,
}

impl<Symbol> Ranked<Symbol> {
    fn new(node: Node<Symbol>, seq: usize) -> Self {
        Self {
            weight: TotalF64(node.weight()),
            seq,
            node,
        }
    }
}

/// A fully built Huffman tree. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct HuffmanTree<Symbol> {
    root: Node<Symbol>,
    leaves: usize,
}

impl<Symbol> HuffmanTree<Symbol> {
    /// Build from parallel symbol and weight arrays.
    pub fn build(symbols: &[Symbol], weights: &[f64]) -> Result<Self>
    where
        Symbol: Eq + Hash + Clone,
    {
        if symbols.len() != weights.len() {
            return Err(Error::LengthMismatch {
                symbols: symbols.len(),
                weights: weights.len(),
            });
        }

        Self::from_weighted(symbols.iter().cloned().zip(weights.iter().copied()))
    }

    /// Build from `(symbol, weight)` pairs. Pair order is the enumeration
    /// order used to break weight ties. A symbol may appear only once.
    pub fn from_weighted(pairs: impl IntoIterator<Item = (Symbol, f64)>) -> Result<Self>
    where
        Symbol: Eq + Hash,
    {
        let pairs = pairs.into_iter();
        let mut entries = Vec::new();
        entries.try_reserve_exact(pairs.size_hint().0)?;

        for (index, (symbol, weight)) in pairs.enumerate() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidWeight { index, weight });
            }
            entries.try_reserve(1)?;
            entries.push(Ranked::new(Node::new(symbol, weight), index));
        }

        if entries.is_empty() {
            return Err(Error::EmptyAlphabet);
        }

        let mut seen = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if let Some(first) = entry.node.symbol().and_then(|s| seen.insert(s, index)) {
                return Err(Error::DuplicateSymbol { index, first });
            }
        }

        let leaves = entries.len();
        let mut queue = MinHeap::from_unordered(entries);
        let mut seq = leaves;

        while !queue.is_single() {
            let left = queue.extract_min()?;
            let right = queue.extract_min()?;
            queue.insert(Ranked::new(Node::from_children(left.node, right.node), seq))?;
            seq += 1;
        }

        let root = queue.extract_min()?.node;
        debug!(leaves, merges = seq - leaves, weight = root.weight(), "built huffman tree");

        Ok(Self { root, leaves })
    }

    pub fn root(&self) -> &Node<Symbol> {
        &self.root
    }

    /// Number of symbols (leaves) in the tree.
    pub fn len(&self) -> usize {
        self.leaves
    }

    pub fn is_empty(&self) -> bool {
        self.leaves == 0
    }

    /// A single-leaf tree: the lone symbol sits at depth 0.
    pub fn is_degenerate(&self) -> bool {
        self.root.is_leaf()
    }

    pub fn max_depth(&self) -> usize {
        let mut depth = 0;
        for_each_leaf(&self.root, self.leaves, |_, _, path| {
            depth = depth.max(path.len());
        });
        depth
    }

    /// Σ weight(s) · depth(s) over all leaves.
    pub fn weighted_path_length(&self) -> f64 {
        let mut total = 0.0;
        for_each_leaf(&self.root, self.leaves, |_, weight, path| {
            total += weight * path.len() as f64;
        });
        total
    }

    /// Depth of every leaf, in depth-first (left before right) order.
    pub fn depths(&self) -> Vec<(&Symbol, usize)> {
        let mut out = Vec::with_capacity(self.leaves);
        for_each_leaf(&self.root, self.leaves, |symbol, _, path| {
            out.push((symbol, path.len()));
        });
        out
    }
}

impl<Symbol> HuffmanTree<Symbol>
where
    Symbol: Eq + Hash + Clone,
{
    /// Build from a sample sequence, weighting each distinct symbol by its
    /// relative frequency. Ties break by first appearance.
    pub fn from_samples(samples: impl IntoIterator<Item = Symbol>) -> Result<Self> {
        let mut index: HashMap<Symbol, usize> = HashMap::new();
        let mut counts: Vec<(Symbol, u64)> = Vec::new();

        for s in samples {
            match index.get(&s) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(s.clone(), counts.len());
                    counts.push((s, 1));
                }
            }
        }

        let total: u64 = counts.iter().map(|(_, c)| c).sum();
        Self::from_weighted(
            counts
                .into_iter()
                .map(|(s, c)| (s, c as f64 / total as f64)),
        )
    }
}
