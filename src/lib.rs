//! Static Huffman coding over a fixed symbol alphabet.
//!
//! A [`HuffmanTree`] is built from per-symbol weights by repeatedly merging
//! the two lightest nodes. The tree gives a prefix-free [`CodeTable`] (left
//! branch `0`, right branch `1`) and drives the [`Encoder`] / [`Decoder`]
//! pair.
//!
//! ```
//! use huffcode::HuffmanTree;
//!
//! let tree = HuffmanTree::build(&['a', 'b', 'c'], &[0.5, 0.25, 0.25])?;
//! let (encoder, decoder) = tree.into_encoder_decoder_pair();
//!
//! let bits = encoder.encode("abcab".chars())?;
//! assert_eq!(decoder.decode(&bits), "abcab".chars().collect::<Vec<_>>());
//! # Ok::<(), huffcode::Error>(())
//! ```

pub mod code;
pub mod codec;
pub mod config;
pub mod error;
pub mod listing;
pub mod pipeline;
pub mod probability;
pub mod queue;
pub mod tree;

pub use code::{to_ascii, CodeTable, SerializableCodeTable};
pub use codec::{DecodeState, Decoder, Encoder, StreamStats};
pub use config::{Config, UnknownSymbolPolicy, ASCII_SIZE};
pub use error::{Error, Result};
pub use listing::{CodeListing, NO_CODE};
pub use probability::ProbabilityTable;
pub use queue::MinHeap;
pub use tree::{HuffmanTree, Node};
