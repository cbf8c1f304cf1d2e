//! Bazaar CLI - terminal client for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the local cart
//! bazaar cart add oak-desk "Oak Desk" 250.00 --old-price 300
//!
//! # Select everything and check out
//! bazaar cart select-all
//! bazaar checkout --name "Ada Lovelace" --email ada@example.com
//!
//! # Browse the catalog
//! bazaar products --category desks
//! bazaar search "oak"
//!
//! # Order history for a signed-in customer
//! bazaar orders --token "$TOKEN"
//! ```
//!
//! The cart lives in `--cart-dir` (default `.bazaar`) and survives between
//! invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use bazaar_core::cart::{CartContainer, KeyValueSnapshotStore};
use bazaar_core::order::CustomerDetails;
use clap::{Parser, Subcommand};
use url::Url;

mod client;
mod commands;
mod error;
mod storage;

use client::ApiClient;
use commands::cart::{CartAction, Toasts};
use error::Result;
use storage::FileBackend;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar storefront client")]
struct Cli {
    /// Storefront base URL
    #[arg(
        long,
        global = true,
        env = "BAZAAR_STOREFRONT_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    storefront_url: Url,

    /// Directory holding the cart snapshot
    #[arg(long, global = true, env = "BAZAAR_CART_DIR", default_value = ".bazaar")]
    cart_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the selected cart lines
    Checkout {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// List products
    Products {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        page: Option<u32>,
    },
    /// Search products
    Search { query: String },
    /// Show order history
    Orders {
        /// Bearer token issued at login
        #[arg(long, env = "BAZAAR_TOKEN", hide_env_values = true)]
        token: String,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bazaar_cli=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let toasts = Toasts::default();
    let open_cart = || {
        CartContainer::with_notifier(
            KeyValueSnapshotStore::new(FileBackend::new(&cli.cart_dir)),
            toasts.notifier(),
        )
    };

    match cli.command {
        Commands::Cart { action } => {
            let mut cart = open_cart();
            commands::cart::run(&mut cart, &toasts, action, &mut out)?;
        }
        Commands::Checkout {
            name,
            email,
            phone,
            address,
        } => {
            let client = ApiClient::new(cli.storefront_url.clone())?;
            let mut cart = open_cart();
            let customer = CustomerDetails {
                name,
                email,
                phone,
                address,
            };
            commands::checkout::run(&mut cart, &client, customer, &mut out).await?;
        }
        Commands::Products { category, page } => {
            let client = ApiClient::new(cli.storefront_url.clone())?;
            commands::catalog::products(&client, category, page, &mut out).await?;
        }
        Commands::Search { query } => {
            let client = ApiClient::new(cli.storefront_url.clone())?;
            commands::catalog::search(&client, query, &mut out).await?;
        }
        Commands::Orders { token } => {
            let client = ApiClient::new(cli.storefront_url.clone())?;
            commands::orders::history(&client, &token, &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}
