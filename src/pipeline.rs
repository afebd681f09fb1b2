//! The top-level file operations. Each one opens its own files and rebuilds
//! the tree from the probability file; nothing is shared between calls.

use std::fs::{self, File};
use std::path::Path;

use tracing::{info, warn};

use crate::codec::{Decoder, Encoder, StreamStats};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::listing::CodeListing;
use crate::probability::ProbabilityTable;
use crate::tree::HuffmanTree;

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::ResourceOpen {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| Error::ResourceOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Remove the partial output of a failed operation.
fn discard(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        warn!(path = %path.display(), %err, "could not remove partial output");
    }
}

/// Read a probability file and build its tree.
pub fn load_tree(probfile: &Path, config: &Config) -> Result<HuffmanTree<u8>> {
    config.validate()?;
    let table = ProbabilityTable::read_from(open(probfile)?, config.alphabet_size)?;
    table.to_tree()
}

/// Estimate symbol probabilities from `sample` and write them to `probfile`.
pub fn estimate_probabilities(
    sample: &Path,
    probfile: &Path,
    config: &Config,
) -> Result<ProbabilityTable> {
    config.validate()?;
    let table =
        ProbabilityTable::from_sample(open(sample)?, config.alphabet_size, config.unknown_symbols)?;
    table.write_to(create(probfile)?)?;

    info!(sample = %sample.display(), probfile = %probfile.display(), "wrote probabilities");
    Ok(table)
}

/// Write the code listing for `probfile` to `out`.
pub fn list_codes(probfile: &Path, out: &Path, config: &Config) -> Result<CodeListing> {
    let tree = load_tree(probfile, config)?;
    let listing = CodeListing::new(&tree.code_table(), config);
    listing.write_to(create(out)?)?;

    info!(
        out = %out.display(),
        shown = listing.printable().count(),
        "wrote code listing"
    );
    Ok(listing)
}

pub fn encode_file(
    probfile: &Path,
    data: &Path,
    encoded: &Path,
    config: &Config,
) -> Result<StreamStats> {
    let tree = load_tree(probfile, config)?;
    let encoder = Encoder::new(tree.code_table()).with_unknown_symbols(config.unknown_symbols);

    let input = open(data)?;
    let output = create(encoded)?;
    let stats = encoder.encode_stream(input, output).inspect_err(|_| discard(encoded))?;

    info!(
        bytes = stats.consumed,
        bits = stats.produced,
        skipped = stats.skipped,
        "encoded {}",
        data.display()
    );
    Ok(stats)
}

pub fn decode_file(
    probfile: &Path,
    encoded: &Path,
    decoded: &Path,
    config: &Config,
) -> Result<StreamStats> {
    let decoder = Decoder::new(load_tree(probfile, config)?);

    let input = open(encoded)?;
    let output = create(decoded)?;
    let stats = decoder.decode_stream(input, output).inspect_err(|_| discard(decoded))?;

    info!(
        bits = stats.consumed,
        bytes = stats.produced,
        discarded = stats.discarded,
        "decoded {}",
        encoded.display()
    );
    Ok(stats)
}
