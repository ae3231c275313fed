use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kvport",
    about = "JSON key-value storage behind named ports",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Store file (overrides the config file)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Config file (defaults to ./kvport.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read and decode a value
    Get(KeyArgs),
    /// Store a JSON value
    Set(KeyValueArgs),
    /// Delete a value
    Remove(KeyArgs),
    /// Delete every value
    Clear,
    /// Add a JSON value to the set stored at a key
    PushToSet(KeyValueArgs),
    /// Remove a JSON value from the set stored at a key
    RemoveFromSet(KeyValueArgs),
    /// List stored keys
    Keys,
    /// Serve port envelopes over stdin/stdout, one JSON object per line
    Serve,
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Args)]
pub struct KeyValueArgs {
    pub key: String,
    /// JSON text, e.g. '"name"', '42' or '{"a":1}'
    pub value: String,
}
