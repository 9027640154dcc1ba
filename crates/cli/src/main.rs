//! Lustre CLI - one-shot storefront commands.
//!
//! Works against the same data directory as the interactive storefront, so a
//! cart built here shows up there and vice versa.
//!
//! # Usage
//!
//! ```bash
//! # List rings matching "emerald"
//! lustre-cli catalog list --category Rings --search emerald
//!
//! # Add product 3 to the saved cart, then take one away
//! lustre-cli cart add 3
//! lustre-cli cart update 3 -1
//!
//! # Place the mocked order
//! lustre-cli checkout
//!
//! # Write the assembled page
//! lustre-cli render --out shop.html
//! ```
//!
//! # Commands
//!
//! - `catalog list` - List products
//! - `cart show|add|update|clear` - Inspect or change the saved cart
//! - `checkout` - Place the mocked order for the saved cart
//! - `render` - Render the storefront page

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lustre_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "lustre-cli")]
#[command(author, version, about = "Lustre storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Inspect or change the saved cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place the mocked order for the saved cart
    Checkout,
    /// Render the storefront page
    Render {
        /// Output file (default: the configured page path)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Only this category ("all" for every category)
        #[arg(short, long)]
        category: Option<String>,

        /// Case-insensitive text to match in name, description or category;
        /// results are narrowed by --category when both are given
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the saved cart
    Show,
    /// Add one of a product
    Add {
        /// Product id
        id: ProductId,
    },
    /// Change a line's quantity (the line is removed at zero)
    Update {
        /// Product id
        id: ProductId,

        /// Quantity change, e.g. 2 or -1
        #[arg(allow_negative_numbers = true)]
        delta: i32,
    },
    /// Empty the saved cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::load()?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, search } => {
                commands::catalog::list(&ctx, category.as_deref(), search.as_deref(), &mut out)?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx, &mut out)?,
            CartAction::Add { id } => commands::cart::add(&ctx, id, &mut out)?,
            CartAction::Update { id, delta } => {
                commands::cart::update(&ctx, id, delta, &mut out)?;
            }
            CartAction::Clear => commands::cart::clear(&ctx, &mut out)?,
        },
        Commands::Checkout => commands::checkout::run(&ctx, &mut out)?,
        Commands::Render { out: target } => {
            commands::render::run(&ctx, target.as_deref(), &mut out).await?;
        }
    }
    Ok(())
}
