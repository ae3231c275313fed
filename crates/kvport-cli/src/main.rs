use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod config;
mod serve;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    // Logs go to stderr: stdout carries port responses under `serve`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();
    commands::run_command(cli)
}
