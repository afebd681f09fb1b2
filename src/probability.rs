//! Per-symbol probability vectors: estimation from a sample and the plain-text
//! probability file format.
//!
//! A probability file holds one decimal value per symbol, in enumeration
//! order, one per line, with no header.

use std::io::{BufReader, BufWriter, Read, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::UnknownSymbolPolicy;
use crate::error::{Error, Result};
use crate::tree::HuffmanTree;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    probabilities: Vec<f64>,
}

impl ProbabilityTable {
    pub fn new(probabilities: Vec<f64>) -> Self {
        Self { probabilities }
    }

    /// Relative frequencies from raw counts.
    pub fn from_counts(counts: &[u64]) -> Result<Self> {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return Err(Error::EmptySample);
        }

        Ok(Self {
            probabilities: counts
                .iter()
                .map(|&c| c as f64 / total as f64)
                .collect(),
        })
    }

    /// Count every byte of `reader` over the alphabet `0..alphabet_size`.
    /// Bytes outside the alphabet are handled per `unknown`.
    pub fn from_sample<R: Read>(
        reader: R,
        alphabet_size: usize,
        unknown: UnknownSymbolPolicy,
    ) -> Result<Self> {
        let mut counts = vec![0u64; alphabet_size];
        let mut skipped = 0usize;

        for byte in BufReader::new(reader).bytes() {
            let byte = byte?;
            match (counts.get_mut(byte as usize), unknown) {
                (Some(count), _) => *count += 1,
                (None, UnknownSymbolPolicy::Skip) => skipped += 1,
                (None, UnknownSymbolPolicy::Fail) => return Err(Error::not_in_alphabet(byte)),
            }
        }

        if skipped > 0 {
            warn!(skipped, "sample bytes outside the alphabet were not counted");
        }
        debug!(
            symbols = counts.iter().filter(|&&c| c > 0).count(),
            total = counts.iter().sum::<u64>(),
            "counted sample"
        );
        Self::from_counts(&counts)
    }

    /// Parse a probability file. The first `alphabet_size` whitespace
    /// separated values are used, anything after them is ignored.
    pub fn read_from<R: Read>(mut reader: R, alphabet_size: usize) -> Result<Self> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;

        let tokens = raw
            .split(|b| b.is_ascii_whitespace())
            .filter(|token| !token.is_empty())
            .take(alphabet_size);

        let mut probabilities = Vec::with_capacity(alphabet_size);
        for (index, token) in tokens.enumerate() {
            let value = std::str::from_utf8(token)
                .ok()
                .and_then(|text| text.parse::<f64>().ok())
                .ok_or_else(|| Error::InvalidProbabilityValue {
                    index,
                    value: String::from_utf8_lossy(token).into_owned(),
                })?;
            probabilities.push(value);
        }

        if probabilities.len() < alphabet_size {
            return Err(Error::MalformedProbabilityData {
                expected: alphabet_size,
                found: probabilities.len(),
            });
        }

        Ok(Self { probabilities })
    }

    /// Write one value per line with eight decimal places.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        for p in &self.probabilities {
            writeln!(writer, "{:.8}", p)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn get(&self, symbol: u8) -> Option<f64> {
        self.probabilities.get(symbol as usize).copied()
    }

    /// Build the tree over byte symbols `0..len`, in that order.
    pub fn to_tree(&self) -> Result<HuffmanTree<u8>> {
        if self.probabilities.len() > 256 {
            return Err(Error::InvalidConfig(format!(
                "{} probabilities do not fit a byte alphabet",
                self.probabilities.len()
            )));
        }

        HuffmanTree::from_weighted(
            self.probabilities
                .iter()
                .enumerate()
                .map(|(i, &p)| (i as u8, p)),
        )
    }
}
