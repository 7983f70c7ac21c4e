//! Order Locator CLI - Database migrations and geocoding checks.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! ol-cli migrate
//!
//! # Geocode one address with the configured provider
//! ol-cli geocode "221B Baker Street, London"
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `geocode` - Resolve a single address to `lat,lng`

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ol-cli")]
#[command(author, version, about = "Order Locator CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Geocode a single address and print `lat,lng`
    Geocode {
        /// Free-text address, passed to the provider verbatim
        address: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Geocode { address } => commands::geocode::run(&address).await?,
    }
    Ok(())
}
