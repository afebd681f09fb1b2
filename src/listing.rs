//! The code listing file: one line per symbol of the alphabet, in enumeration
//! order. Printable symbols get their code as `0`/`1` characters, everything
//! else gets [`NO_CODE`].

use std::io::{BufWriter, Write};

use tracing::debug;

use crate::code::{to_ascii, CodeTable};
use crate::config::Config;
use crate::error::Result;

pub const NO_CODE: &str = "No code";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeListing {
    entries: Vec<(u8, Option<String>)>,
}

impl CodeListing {
    pub fn new(table: &CodeTable<u8>, config: &Config) -> Self {
        let entries = config
            .symbols()
            .map(|symbol| {
                if !config.is_printable(symbol) {
                    return (symbol, None);
                }
                let code = table.get(&symbol).map(to_ascii);
                if code.is_none() {
                    debug!(symbol, "printable symbol has no code");
                }
                (symbol, code)
            })
            .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[(u8, Option<String>)] {
        &self.entries
    }

    /// Symbols that were given a code, with that code.
    pub fn printable(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        self.entries
            .iter()
            .filter_map(|(symbol, code)| code.as_deref().map(|c| (*symbol, c)))
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        for (_, code) in &self.entries {
            writeln!(writer, "{}", code.as_deref().unwrap_or(NO_CODE))?;
        }
        writer.flush()?;
        Ok(())
    }
}
