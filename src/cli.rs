use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chunk-relay")]
#[command(
    about = "Format text or HTML, split it into message-sized chunks and deliver \
                   each chunk with retries."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the chunks the content would be delivered as.
    Split(ContentArgs),
    /// Deliver the content through the dry-run stdout transport.
    Send(SendArgs),
}

/// Options shared by every subcommand that reads content.
#[derive(Args, Debug, Clone)]
pub struct ContentArgs {
    /// Input file; "-" reads stdin.
    #[arg(default_value = "-")]
    pub input: String,

    /// TOML config file.
    #[arg(short = 'C', long = "config")]
    pub config: Option<PathBuf>,

    /// Maximum chunk length in characters (overrides config).
    #[arg(short = 'L', long = "max-len", value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_len: Option<usize>,

    /// Format template applied before chunking.
    #[arg(short = 't', long = "template", default_value = "default")]
    pub template: String,

    /// Element wrapped around markup chunks; empty string disables wrapping.
    #[arg(long = "container-tag")]
    pub container_tag: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    #[command(flatten)]
    pub content: ContentArgs,

    /// Destination id (overrides the configured default).
    #[arg(short = 'd', long = "to")]
    pub destination: Option<String>,

    /// Maximum delivery attempts per chunk (overrides config).
    #[arg(short = 'r', long = "retries")]
    pub retries: Option<u32>,
}
