use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use huffcode::{pipeline, Config, UnknownSymbolPolicy};

#[derive(Debug, Parser)]
#[command(name = "huffcode")]
#[command(about = "Static Huffman coding of byte streams from a probability file")]
struct Cli {
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    /// TOML config file. Flags below override its values.
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Number of symbols, the byte values 0..N [default: 128].
    #[arg(long, global = true)]
    alphabet_size: Option<usize>,

    /// What to do with input bytes that have no code [default: skip].
    #[arg(long, global = true, value_enum)]
    unknown_symbols: Option<UnknownSymbolPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Estimate symbol probabilities from a sample file.
    #[command(visible_alias = "p")]
    Probabilities { sample: PathBuf, probfile: PathBuf },

    /// Write the code listing for a probability file.
    #[command(visible_alias = "s")]
    Codes {
        probfile: PathBuf,
        /// Listing destination [default: `codes_file` from the config].
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Encode a data file into a 0/1 text file.
    #[command(visible_alias = "e")]
    Encode {
        probfile: PathBuf,
        data: PathBuf,
        encoded: PathBuf,
    },

    /// Decode a 0/1 text file back into bytes.
    #[command(visible_alias = "d")]
    Decode {
        probfile: PathBuf,
        encoded: PathBuf,
        decoded: PathBuf,
    },

    /// Print the effective configuration as TOML.
    ShowConfig,
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(size) = cli.alphabet_size {
        config.alphabet_size = size;
    }
    if let Some(policy) = cli.unknown_symbols {
        config.unknown_symbols = policy;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cli.log))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Probabilities { sample, probfile } => {
            pipeline::estimate_probabilities(&sample, &probfile, &config).with_context(|| {
                format!("computing probabilities of {}", sample.display())
            })?;
        }
        Commands::Codes { probfile, out } => {
            let out = out.unwrap_or_else(|| config.codes_file.clone());
            let listing = pipeline::list_codes(&probfile, &out, &config)
                .with_context(|| format!("listing codes for {}", probfile.display()))?;

            println!(
                "Huffman codes [{} to {}]:",
                config.printable.start(),
                config.printable.end()
            );
            for (_, code) in listing.printable() {
                println!("{code}");
            }
        }
        Commands::Encode {
            probfile,
            data,
            encoded,
        } => {
            pipeline::encode_file(&probfile, &data, &encoded, &config)
                .with_context(|| format!("encoding {}", data.display()))?;
        }
        Commands::Decode {
            probfile,
            encoded,
            decoded,
        } => {
            pipeline::decode_file(&probfile, &encoded, &decoded, &config)
                .with_context(|| format!("decoding {}", encoded.display()))?;
        }
        Commands::ShowConfig => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
