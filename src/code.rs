//! Symbol → bit-path code tables derived from a [`HuffmanTree`].
//!
//! Paths are accumulated root to leaf, `0` for a left branch and `1` for a
//! right branch. The walk is iterative with a single path buffer sized to the
//! tree's depth bound, so very skewed trees don't recurse.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::ControlFlow;

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tree::{HuffmanTree, Node};

/// Depth-first walk over every leaf, left subtree first. `visit` receives the
/// leaf's symbol, weight and root-to-leaf path and may stop the walk early.
pub(crate) fn walk_leaves<'t, Symbol, B, F>(
    root: &'t Node<Symbol>,
    depth_bound: usize,
    mut visit: F,
) -> Option<B>
where
    F: FnMut(&'t Symbol, f64, &BitSlice) -> ControlFlow<B>,
{
    let mut path: BitVec = BitVec::with_capacity(depth_bound);
    let mut stack: Vec<(&'t Node<Symbol>, usize, Option<bool>)> = vec![(root, 0, None)];

    while let Some((node, depth, branch)) = stack.pop() {
        if let Some(bit) = branch {
            path.truncate(depth - 1);
            path.push(bit);
        }

        match node {
            Node::Leaf { symbol, weight } => {
                if let ControlFlow::Break(b) = visit(symbol, *weight, &path) {
                    return Some(b);
                }
            }
            Node::Internal { left, right, .. } => {
                // right is pushed first so the left subtree is walked first
                stack.push((right.as_ref(), depth + 1, Some(true)));
                stack.push((left.as_ref(), depth + 1, Some(false)));
            }
        }
    }

    None
}

pub(crate) fn for_each_leaf<'t, Symbol, F>(root: &'t Node<Symbol>, depth_bound: usize, mut visit: F)
where
    F: FnMut(&'t Symbol, f64, &BitSlice),
{
    walk_leaves::<_, (), _>(root, depth_bound, |symbol, weight, path| {
        visit(symbol, weight, path);
        ControlFlow::Continue(())
    });
}

/// The code of the lone symbol in a single-leaf tree. A zero-length code
/// can't be walked by the decoder, so it is given one `0` bit.
fn degenerate_code() -> BitBox {
    BitVec::<usize, Lsb0>::repeat(false, 1).into_boxed_bitslice()
}

/// Render a code as ASCII `0`/`1` characters.
pub fn to_ascii(bits: &BitSlice) -> String {
    bits.iter()
        .by_vals()
        .map(|b| if b { '1' } else { '0' })
        .collect()
}

impl<Symbol> HuffmanTree<Symbol> {
    /// Code for a single symbol, or `None` if the tree has no leaf for it.
    pub fn code_for(&self, target: &Symbol) -> Option<BitBox>
    where
        Symbol: PartialEq,
    {
        if self.is_degenerate() {
            return (self.root().symbol() == Some(target)).then(degenerate_code);
        }

        walk_leaves(self.root(), self.len(), |symbol, _, path| {
            if symbol == target {
                ControlFlow::Break(path.to_bitvec().into_boxed_bitslice())
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Codes for every symbol in the tree.
    pub fn code_table(&self) -> CodeTable<Symbol>
    where
        Symbol: Eq + Hash + Clone,
    {
        CodeTable::from_tree(self)
    }
}

#[derive(Debug, Clone)]
pub struct CodeTable<Symbol> {
    codes: HashMap<Symbol, BitBox>,
    order: Vec<Symbol>,
}

impl<Symbol> CodeTable<Symbol>
where
    Symbol: Eq + Hash + Clone,
{
    pub fn from_tree(tree: &HuffmanTree<Symbol>) -> Self {
        let mut codes = HashMap::with_capacity(tree.len());
        let mut order = Vec::with_capacity(tree.len());

        if tree.is_degenerate() {
            for_each_leaf(tree.root(), 0, |symbol, _, _| {
                codes.insert(symbol.clone(), degenerate_code());
                order.push(symbol.clone());
            });
        } else {
            for_each_leaf(tree.root(), tree.len(), |symbol, _, path| {
                codes.insert(symbol.clone(), path.to_bitvec().into_boxed_bitslice());
                order.push(symbol.clone());
            });
        }

        Self { codes, order }
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&BitSlice> {
        self.codes.get(symbol).map(|code| &code[..])
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.codes.contains_key(symbol)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Codes in depth-first leaf order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &BitSlice)> + '_ {
        self.order
            .iter()
            .filter_map(move |s| self.codes.get(s).map(|code| (s, &code[..])))
    }
}

/// Persisted form of a [`CodeTable`]. Each code is stored as its bit length
/// and the packed words backing it.
#[derive(Serialize, Deserialize)]
pub struct SerializableCodeTable<Symbol> {
    codes: Vec<(Symbol, (usize, Box<[usize]>))>,
}

impl<'a, Symbol> From<&'a CodeTable<Symbol>> for SerializableCodeTable<Symbol>
where
    Symbol: Eq + Hash + Clone,
{
    fn from(other: &'a CodeTable<Symbol>) -> Self {
        Self {
            codes: other
                .iter()
                .map(|(symbol, code)| {
                    let len = code.len();
                    let words = code.to_bitvec().into_boxed_bitslice().into_boxed_slice();

                    (symbol.clone(), (len, words))
                })
                .collect(),
        }
    }
}

impl<Symbol> From<SerializableCodeTable<Symbol>> for CodeTable<Symbol>
where
    Symbol: Eq + Hash + Clone,
{
    fn from(other: SerializableCodeTable<Symbol>) -> Self {
        let mut codes = HashMap::with_capacity(other.codes.len());
        let mut order = Vec::with_capacity(other.codes.len());

        for (symbol, (len, words)) in other.codes {
            let mut bv = BitBox::from_boxed_slice(words).into_bitvec();
            bv.resize(len, false);
            codes.insert(symbol.clone(), bv.into_boxed_bitslice());
            order.push(symbol);
        }

        Self { codes, order }
    }
}
