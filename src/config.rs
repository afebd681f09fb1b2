//! Settings shared by the file operations. Read from an optional TOML file,
//! then overridden from the command line.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Size of the 7-bit ASCII alphabet the probability files are written for.
pub const ASCII_SIZE: usize = 128;

/// What the encoder does with a symbol that has no code.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSymbolPolicy {
    /// Drop the symbol, count it and log a warning.
    #[default]
    Skip,
    /// Abort with `SymbolNotInAlphabet`.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Symbols are the byte values `0..alphabet_size`.
    pub alphabet_size: usize,
    pub unknown_symbols: UnknownSymbolPolicy,
    /// Default destination of the code listing.
    pub codes_file: PathBuf,
    /// Symbols whose codes are shown in a code listing.
    pub printable: RangeInclusive<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            alphabet_size: ASCII_SIZE,
            unknown_symbols: UnknownSymbolPolicy::Skip,
            codes_file: PathBuf::from("codes.txt"),
            printable: 32..=126,
        }
    }
}

impl Config {
    /// Load a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ResourceOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&text)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| Error::InvalidConfig(err.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=256).contains(&self.alphabet_size) {
            return Err(Error::InvalidConfig(format!(
                "alphabet size must be between 1 and 256, got {}",
                self.alphabet_size
            )));
        }
        if self.printable.start() > self.printable.end() {
            return Err(Error::InvalidConfig(format!(
                "printable range {}..={} is empty",
                self.printable.start(),
                self.printable.end()
            )));
        }
        Ok(())
    }

    /// The alphabet in enumeration order.
    pub fn symbols(&self) -> impl Iterator<Item = u8> {
        (0..self.alphabet_size.min(256)).map(|i| i as u8)
    }

    pub fn is_printable(&self, symbol: u8) -> bool {
        self.printable.contains(&symbol)
    }
}
