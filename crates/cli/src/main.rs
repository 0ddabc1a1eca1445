//! KiranaMitra CLI - stock overview and restocking advice from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List stock with health levels (demo data)
//! kirana stock
//!
//! # Dashboard summary for items loaded from a file
//! kirana dashboard --inventory shop.yaml
//!
//! # Show the prompt an analysis would send
//! kirana prompt --inventory shop.yaml
//!
//! # Ask Gemini for advice, giving up after 10 seconds
//! kirana analyze --inventory shop.yaml --timeout 10
//! ```
//!
//! # Commands
//!
//! - `stock` - Print every item with its stock level
//! - `dashboard` - Low-stock count, top seller and a short preview
//! - `prompt` - Print the analysis prompt without calling the model
//! - `analyze` - Run an analysis and print the report
//!
//! Without `--inventory` the demo items are used.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "kirana")]
#[command(author, version, about = "KiranaMitra inventory assistant")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InventoryArgs {
    /// YAML file with an `items` list; demo data when omitted
    #[arg(short, long)]
    inventory: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every item with its stock level
    Stock {
        #[command(flatten)]
        source: InventoryArgs,
    },
    /// Print the dashboard summary
    Dashboard {
        #[command(flatten)]
        source: InventoryArgs,
    },
    /// Print the analysis prompt without sending it
    Prompt {
        #[command(flatten)]
        source: InventoryArgs,
    },
    /// Ask the advisor for restocking advice
    Analyze {
        #[command(flatten)]
        source: InventoryArgs,

        /// Seconds to wait for the model (overrides `ADVISOR_TIMEOUT_SECS`)
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Filter used when `RUST_LOG` is unset: the `kirana` binary and the library crates.
const DEFAULT_LOG_FILTER: &str = "kirana=info,kirana_mitra=info";

/// Logs go to stderr so command output stays pipeable.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var("KIRANA_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Stock { source } => {
            let store = commands::inventory::load(source.inventory.as_deref()).await?;
            commands::inventory::stock(&store);
        }
        Commands::Dashboard { source } => {
            let store = commands::inventory::load(source.inventory.as_deref()).await?;
            commands::inventory::dashboard(store);
        }
        Commands::Prompt { source } => {
            let store = commands::inventory::load(source.inventory.as_deref()).await?;
            commands::advice::prompt(&store);
        }
        Commands::Analyze { source, timeout } => {
            let store = commands::inventory::load(source.inventory.as_deref()).await?;
            commands::advice::analyze(store, timeout).await?;
        }
    }
    Ok(())
}
