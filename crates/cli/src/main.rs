//! RocketShoes CLI - Drive the cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cart show
//!
//! # Add one unit of product 1 (validated against the stock service)
//! rs-cart add 1
//!
//! # Set product 1 to three units
//! rs-cart update 1 3
//!
//! # Remove product 1
//! rs-cart remove 1
//!
//! # Work offline against a catalog file instead of STOCK_API_URL
//! rs-cart --catalog server.json add 2
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    /// Catalog JSON file (`products` + `stock`) to use instead of the stock API
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory holding the persisted cart
    #[arg(long, global = true, env = "CART_STORAGE_DIR", default_value = ".cart")]
    storage_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set a product's quantity (zero or less is ignored)
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), commands::cart::CliError> {
    let session = commands::cart::open(cli.catalog.as_deref(), &cli.storage_dir).await?;

    let action = match cli.command {
        Commands::Show => commands::cart::Action::Show,
        Commands::Add { product_id } => commands::cart::Action::Add(product_id),
        Commands::Remove { product_id } => commands::cart::Action::Remove(product_id),
        Commands::Update { product_id, amount } => {
            commands::cart::Action::Update { product_id, amount }
        }
    };

    let cart = session.apply(action).await?;
    commands::cart::print_cart(&cart);
    Ok(())
}
