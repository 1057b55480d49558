//! Midori CLI - Database migrations and data tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the documents table
//! midori-cli migrate
//!
//! # Load menu items from a YAML file
//! midori-cli seed menuitem data/menu.yaml
//!
//! # Print the stored menu, optionally one category
//! midori-cli menu list --category Tea
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Validate and insert records from a YAML file
//! - `menu list` - Print stored menu items as JSON
//!
//! All commands read `DATABASE_URL` and `DATABASE_NAME` from the
//! environment (or `.env`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use midori_core::RecordKind;

mod commands;

#[derive(Parser)]
#[command(name = "midori-cli")]
#[command(author, version, about = "Midori Teehaus backend tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Validate and insert records from a YAML list
    Seed {
        /// Record kind (menuitem, inquiry, user, product)
        kind: RecordKind,

        /// YAML file containing a list of records
        file: PathBuf,
    },
    /// Inspect the menu
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
}

#[derive(Subcommand)]
enum MenuAction {
    /// Print stored menu items as JSON
    List {
        /// Only items in this category
        #[arg(short, long)]
        category: Option<String>,
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
        Commands::Seed { kind, file } => {
            commands::seed::records(kind, &file).await?;
        }
        Commands::Menu { action } => match action {
            MenuAction::List { category } => commands::menu::list(category).await?,
        },
    }
    Ok(())
}
