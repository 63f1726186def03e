//! atomctl - encode, decode and compare atoms from the command line
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

mod commands;

use std::io::Read;

use anyhow::{Context, Result};
use atomkit_wire::{DecodeConfig, Decoder};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "atomctl")]
#[command(about = "Encode, decode and compare atoms")]
struct Cli {
    /// Maximum container nesting accepted when decoding
    #[arg(long, global = true)]
    max_depth: Option<usize>,

    /// Use strict decode limits for untrusted input
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON document and print the bytes as hex
    Encode {
        /// JSON text, or "-" to read stdin
        input: String,
    },
    /// Decode hex bytes and print the kind and JSON value
    Decode {
        /// Hex text, or "-" to read stdin
        input: String,
    },
    /// Check whether every element of a JSON array is equivalent
    Compare {
        /// JSON array text, or "-" to read stdin
        input: String,
    },
}

impl Cli {
    fn decoder(&self) -> Decoder {
        let mut config = if self.strict {
            DecodeConfig::strict()
        } else {
            DecodeConfig::default()
        };
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        Decoder::new(config)
    }
}

fn read_input(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_owned());
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let output = match &cli.command {
        Commands::Encode { input } => commands::encode_json(&read_input(input)?)?,
        Commands::Decode { input } => commands::decode_hex(&read_input(input)?, &cli.decoder())?,
        Commands::Compare { input } => commands::compare_json(&read_input(input)?)?,
    };
    println!("{}", output);
    Ok(())
}
