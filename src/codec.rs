//! Streaming encode and decode over a Huffman tree.
//!
//! Encoded output carries no separators, padding or length header: code
//! boundaries are recovered only by walking the tree. A stream that stops
//! partway through a code loses that trailing partial code.

use std::fmt::Debug;
use std::hash::Hash;
use std::io::{BufReader, BufWriter, Read, Write};

use bitvec::prelude::*;
use tracing::{trace, warn};

use crate::code::CodeTable;
use crate::config::UnknownSymbolPolicy;
use crate::error::{Error, Result};
use crate::tree::{HuffmanTree, Node};

/// Counters reported by the streaming operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Input units (bytes or bits) consumed.
    pub consumed: usize,
    /// Output units (bits or bytes) produced.
    pub produced: usize,
    /// Input units ignored: out-of-alphabet symbols or non-bit characters.
    pub skipped: usize,
    /// Bits of an unterminated code left over at end of input.
    pub discarded: usize,
}

impl<Symbol> HuffmanTree<Symbol>
where
    Symbol: Eq + Hash + Clone,
{
    pub fn into_encoder_decoder_pair(self) -> (Encoder<Symbol>, Decoder<Symbol>) {
        let table = self.code_table();
        (Encoder::new(table), Decoder::new(self))
    }
}

#[derive(Debug, Clone)]
pub struct Encoder<Symbol> {
    table: CodeTable<Symbol>,
    unknown: UnknownSymbolPolicy,
}

impl<Symbol> Encoder<Symbol> {
    pub fn new(table: CodeTable<Symbol>) -> Self {
        Self {
            table,
            unknown: UnknownSymbolPolicy::default(),
        }
    }

    pub fn with_unknown_symbols(mut self, policy: UnknownSymbolPolicy) -> Self {
        self.unknown = policy;
        self
    }
}

impl<Symbol> Encoder<Symbol>
where
    Symbol: Eq + Hash + Clone + Debug,
{
    fn lookup(&self, symbol: &Symbol) -> Result<Option<&BitSlice>> {
        match self.table.get(symbol) {
            Some(code) => Ok(Some(code)),
            None => match self.unknown {
                UnknownSymbolPolicy::Fail => Err(Error::not_in_alphabet(symbol)),
                UnknownSymbolPolicy::Skip => {
                    warn!(?symbol, "skipping symbol outside the alphabet");
                    Ok(None)
                }
            },
        }
    }

    pub fn encode(&self, stream: impl IntoIterator<Item = Symbol>) -> Result<BitVec> {
        let mut out = BitVec::new();
        for s in stream {
            if let Some(code) = self.lookup(&s)? {
                out.extend_from_bitslice(code);
            }
        }

        Ok(out)
    }
}

impl Encoder<u8> {
    /// Encode a byte stream as ASCII `0`/`1` characters, one code per input
    /// byte.
    pub fn encode_stream<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<StreamStats> {
        let mut writer = BufWriter::new(writer);
        let mut stats = StreamStats::default();

        for byte in BufReader::new(reader).bytes() {
            let byte = byte?;
            stats.consumed += 1;

            let Some(code) = self.lookup(&byte)? else {
                stats.skipped += 1;
                continue;
            };
            for bit in code.iter().by_vals() {
                writer.write_all(if bit { b"1" } else { b"0" })?;
            }
            stats.produced += code.len();
        }

        writer.flush()?;
        Ok(stats)
    }
}

/// Walk-until-leaf decoder. The cursor starts at the root and returns there
/// after every emitted symbol.
#[derive(Debug)]
pub struct DecodeState<'t, Symbol> {
    root: &'t Node<Symbol>,
    cursor: &'t Node<Symbol>,
    pending: usize,
}

impl<'t, Symbol> DecodeState<'t, Symbol> {
    pub fn new(root: &'t Node<Symbol>) -> Self {
        Self {
            root,
            cursor: root,
            pending: 0,
        }
    }

    /// Feed one bit; returns the symbol if this bit completed a code.
    pub fn push(&mut self, bit: bool) -> Option<&'t Symbol> {
        let cursor: &'t Node<Symbol> = self.cursor;
        let next = match cursor {
            // only a single-leaf tree has a leaf under the cursor
            Node::Leaf { symbol, .. } => return (!bit).then_some(symbol),
            Node::Internal { left, right, .. } => {
                if bit {
                    right
                } else {
                    left
                }
            }
        };

        match next.as_ref() {
            Node::Leaf { symbol, .. } => {
                self.cursor = self.root;
                self.pending = 0;
                Some(symbol)
            }
            internal => {
                self.cursor = internal;
                self.pending += 1;
                None
            }
        }
    }

    /// Bits consumed since the last emitted symbol.
    pub fn pending_bits(&self) -> usize {
        self.pending
    }

    /// End of input. Returns the number of discarded trailing bits.
    pub fn finish(self) -> usize {
        if self.pending > 0 {
            trace!(bits = self.pending, "discarding unterminated trailing code");
        }
        self.pending
    }
}

#[derive(Debug, Clone)]
pub struct Decoder<Symbol> {
    tree: HuffmanTree<Symbol>,
}

impl<Symbol> Decoder<Symbol>
where
    Symbol: Clone,
{
    pub fn new(tree: HuffmanTree<Symbol>) -> Self {
        Self { tree }
    }

    pub fn state(&self) -> DecodeState<'_, Symbol> {
        DecodeState::new(self.tree.root())
    }

    pub fn decode(&self, input: &BitSlice) -> Vec<Symbol> {
        let mut out = Vec::new();
        let mut state = self.state();

        for b in input.iter().by_vals() {
            if let Some(sym) = state.push(b) {
                out.push(sym.clone());
            }
        }
        state.finish();

        out
    }
}

impl Decoder<u8> {
    /// Decode ASCII `0`/`1` characters back to bytes. Any other byte in the
    /// input (a trailing newline, say) is skipped.
    pub fn decode_stream<R: Read, W: Write>(&self, reader: R, writer: W) -> Result<StreamStats> {
        let mut writer = BufWriter::new(writer);
        let mut stats = StreamStats::default();
        let mut state = self.state();

        for byte in BufReader::new(reader).bytes() {
            let bit = match byte? {
                b'0' => false,
                b'1' => true,
                _ => {
                    stats.skipped += 1;
                    continue;
                }
            };
            stats.consumed += 1;

            if let Some(&symbol) = state.push(bit) {
                writer.write_all(&[symbol])?;
                stats.produced += 1;
            }
        }

        stats.discarded = state.finish();
        writer.flush()?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::to_ascii;

    fn bits(s: &str) -> BitVec {
        s.chars().map(|c| c == '1').collect()
    }

    fn abc() -> (Encoder<char>, Decoder<char>) {
        HuffmanTree::build(&['a', 'b', 'c'], &[0.5, 0.25, 0.25])
            .unwrap()
            .into_encoder_decoder_pair()
    }

    #[test]
    fn test_encode_decode() {
        let s = String::from(
            "This is a really long message, I sure do hope it encodes and decodes properly.",
        );
        let tree = HuffmanTree::from_samples(s.bytes()).unwrap();
        let (e, d) = tree.into_encoder_decoder_pair();

        let out = e.encode(s.bytes()).unwrap();
        let dec = String::from_utf8(d.decode(&out)).unwrap();

        assert_eq!(dec, s);
    }

    #[test]
    fn codes_are_concatenated() {
        let (e, _) = abc();
        let out = e.encode("abca".chars()).unwrap();
        assert_eq!(to_ascii(&out), "010110");
    }

    #[test]
    fn empty_streams() {
        let (e, d) = abc();
        assert!(e.encode(std::iter::empty()).unwrap().is_empty());
        assert!(d.decode(&bits("")).is_empty());
    }

    #[test]
    fn trailing_partial_code_is_dropped() {
        let (_, d) = abc();
        assert_eq!(d.decode(&bits("0101")), vec!['a', 'b']);

        let mut state = d.state();
        for b in bits("011").iter().by_vals() {
            state.push(b);
        }
        assert_eq!(state.pending_bits(), 0);
        state.push(true);
        assert_eq!(state.pending_bits(), 1);
        assert_eq!(state.finish(), 1);
    }

    #[test]
    fn unknown_symbol_is_skipped_by_default() {
        let (e, d) = abc();
        let out = e.encode("azb".chars()).unwrap();
        assert_eq!(to_ascii(&out), "010");
        assert_eq!(d.decode(&out), vec!['a', 'b']);
    }

    #[test]
    fn unknown_symbol_fails_when_strict() {
        let (e, _) = abc();
        let e = e.with_unknown_symbols(UnknownSymbolPolicy::Fail);
        let err = e.encode("abz".chars()).unwrap_err();
        assert!(matches!(err, Error::SymbolNotInAlphabet { ref symbol } if symbol == "'z'"));
    }

    #[test]
    fn single_symbol_round_trip() {
        let (e, d) = HuffmanTree::build(&[b'x'], &[1.0])
            .unwrap()
            .into_encoder_decoder_pair();

        let out = e.encode(b"xxx".iter().copied()).unwrap();
        assert_eq!(to_ascii(&out), "000");
        assert_eq!(d.decode(&out), b"xxx".to_vec());
        // a 1 bit has nowhere to go from a leaf root
        assert_eq!(d.decode(&bits("0110")), b"xx".to_vec());
    }

    #[test]
    fn ascii_stream_round_trip() {
        let text = b"streams of bytes, one code per byte";
        let (e, d) = HuffmanTree::from_samples(text.iter().copied())
            .unwrap()
            .into_encoder_decoder_pair();

        let mut encoded = Vec::new();
        let enc_stats = e.encode_stream(&text[..], &mut encoded).unwrap();
        assert_eq!(enc_stats.consumed, text.len());
        assert_eq!(enc_stats.produced, encoded.len());
        assert!(encoded.iter().all(|b| *b == b'0' || *b == b'1'));

        encoded.push(b'\n');
        let mut decoded = Vec::new();
        let dec_stats = d.decode_stream(&encoded[..], &mut decoded).unwrap();

        assert_eq!(decoded, text.to_vec());
        assert_eq!(dec_stats.produced, text.len());
        assert_eq!(dec_stats.skipped, 1);
        assert_eq!(dec_stats.discarded, 0);
    }

    #[test]
    fn stream_skip_counts_unknown_bytes() {
        let (e, _) = HuffmanTree::build(&[b'a', b'b'], &[0.5, 0.5])
            .unwrap()
            .into_encoder_decoder_pair();

        let mut encoded = Vec::new();
        let stats = e.encode_stream(&b"a?b"[..], &mut encoded).unwrap();
        assert_eq!(encoded, b"01".to_vec());
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.consumed, 3);

        let strict = e.with_unknown_symbols(UnknownSymbolPolicy::Fail);
        let err = strict.encode_stream(&b"a?b"[..], Vec::new()).unwrap_err();
        assert!(matches!(err, Error::SymbolNotInAlphabet { .. }));
    }
}
