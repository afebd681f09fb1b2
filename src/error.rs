//! Error types for tree construction, coding and the file pipeline.

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for huffcode operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A tree was requested over zero symbols.
    #[error("cannot build a code over an empty alphabet")]
    EmptyAlphabet,

    /// `extract_min` on an empty queue. Never surfaces from a correct tree build.
    #[error("extract from an empty priority queue")]
    EmptyQueue,

    #[error("failed to reserve queue storage: {0}")]
    Allocation(#[from] TryReserveError),

    /// A probability, sample or data file could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    ResourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed probability data: expected {expected} values, found {found}")]
    MalformedProbabilityData { expected: usize, found: usize },

    #[error("malformed probability value {value:?} at entry {index}")]
    InvalidProbabilityValue { index: usize, value: String },

    /// Weights must be finite and non-negative.
    #[error("invalid weight {weight} for symbol #{index}")]
    InvalidWeight { index: usize, weight: f64 },

    /// The alphabet is a set: each symbol may appear once.
    #[error("symbol #{index} repeats symbol #{first}")]
    DuplicateSymbol { index: usize, first: usize },

    #[error("{symbols} symbols but {weights} weights")]
    LengthMismatch { symbols: usize, weights: usize },

    #[error("symbol {symbol} is not in the alphabet")]
    SymbolNotInAlphabet { symbol: String },

    #[error("sample is empty, no probabilities to estimate")]
    EmptySample,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn not_in_alphabet(symbol: impl std::fmt::Debug) -> Self {
        Error::SymbolNotInAlphabet {
            symbol: format!("{:?}", symbol),
        }
    }
}
