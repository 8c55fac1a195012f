//! Baby Sneakers CLI - Database migrations and catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run catalog database migrations
//! bs-cli migrate
//!
//! # Seed the catalog from a YAML file, replacing existing products
//! bs-cli seed products.yaml --clear
//!
//! # List or delete every product
//! bs-cli products list
//! bs-cli products clear --yes
//!
//! # Send a diagnostic email to the contact inbox
//! bs-cli email test
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Insert products from a YAML file
//! - `products` - Inspect or clear the catalog
//! - `email test` - Verify SMTP configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "bs-cli")]
#[command(author, version, about = "Baby Sneakers CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert products from a YAML file
    Seed {
        /// Path to the YAML file
        file: String,

        /// Delete existing products first
        #[arg(long)]
        clear: bool,
    },
    /// Inspect or clear the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Email diagnostics
    Email {
        #[command(subcommand)]
        action: EmailAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product, newest first
    List,
    /// Delete every product
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum EmailAction {
    /// Send a test email to the contact inbox
    Test,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

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
        Commands::Seed { file, clear } => commands::seed::products(&file, clear).await?,
        Commands::Products { action } => match action {
            ProductsAction::List => commands::products::list().await?,
            ProductsAction::Clear { yes } => commands::products::clear(yes).await?,
        },
        Commands::Email { action } => match action {
            EmailAction::Test => commands::email::test().await?,
        },
    }
    Ok(())
}
