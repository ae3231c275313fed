use std::io;
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::Value;

use kvport_adapter::{StorageAdapter, TracingHook};
use kvport_protocol::{EnvelopeCodec, PortResponse};
use kvport_store::{FileStore, KeyValueStore};

use crate::cli::*;
use crate::config::CliConfig;
use crate::serve::serve;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("resolving working directory")?;
    let config = CliConfig::resolve(cli.config.as_deref(), &cwd)?;
    let store_path = cli.store.clone().unwrap_or(config.store_path);
    let store = FileStore::open(&store_path)
        .with_context(|| format!("opening store {}", store_path.display()))?;

    let adapter = if cli.verbose || config.trace_ports {
        StorageAdapter::with_hook(store, TracingHook)
    } else {
        StorageAdapter::new(store)
    };

    match cli.command {
        Command::Get(args) => cmd_get(&adapter, args, &cli.format),
        Command::Set(args) => {
            let value = parse_value(&args.value)?;
            adapter.set_item(&args.key, &value)?;
            report(&cli.format, "Set", &args.key);
            Ok(())
        }
        Command::Remove(args) => {
            adapter.remove_item(&args.key)?;
            report(&cli.format, "Removed", &args.key);
            Ok(())
        }
        Command::Clear => {
            adapter.clear()?;
            if matches!(cli.format, OutputFormat::Text) {
                println!("{} Cleared {}", "✓".green().bold(), store_path.display());
            }
            Ok(())
        }
        Command::PushToSet(args) => {
            let value = parse_value(&args.value)?;
            adapter.push_to_set(&args.key, &value)?;
            report(&cli.format, "Pushed to", &args.key);
            Ok(())
        }
        Command::RemoveFromSet(args) => {
            let value = parse_value(&args.value)?;
            adapter.remove_from_set(&args.key, &value)?;
            report(&cli.format, "Removed from", &args.key);
            Ok(())
        }
        Command::Keys => cmd_keys(adapter.store(), &cli.format),
        Command::Serve => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            serve(Arc::new(adapter), stdin.lock(), stdout.lock())?;
            Ok(())
        }
    }
}

/// Parse a command-line value as JSON text.
fn parse_value(text: &str) -> anyhow::Result<Value> {
    serde_json::from_str(text).with_context(|| {
        format!("value is not JSON: {text} (quote strings, e.g. '\"{text}\"')")
    })
}

fn report(format: &OutputFormat, verb: &str, key: &str) {
    if matches!(format, OutputFormat::Text) {
        println!("{} {} {}", "✓".green().bold(), verb, key.yellow());
    }
}

fn cmd_get<S: KeyValueStore>(
    adapter: &StorageAdapter<S>,
    args: KeyArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let value = adapter.get_item(&args.key)?;
    match format {
        OutputFormat::Text => {
            if value.is_null() {
                println!("{} = {}", args.key.bold(), "null".dimmed());
            } else {
                println!("{} = {}", args.key.bold(), serde_json::to_string_pretty(&value)?);
            }
        }
        OutputFormat::Json => {
            let response = PortResponse::GetItem { key: args.key, value };
            print!("{}", EnvelopeCodec::encode(&response.to_envelope())?);
        }
    }
    Ok(())
}

fn cmd_keys<S: KeyValueStore>(store: &S, format: &OutputFormat) -> anyhow::Result<()> {
    let keys = store.keys()?;
    match format {
        OutputFormat::Text => {
            if keys.is_empty() {
                println!("No keys stored.");
            }
            for key in keys {
                println!("  {}", key.yellow());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(&keys)?),
    }
    Ok(())
}
