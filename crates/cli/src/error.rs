//! CLI error type.

use bazaar_core::CartItemId;
use bazaar_core::cart::SnapshotError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("request to storefront failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The storefront answered with an error status.
    #[error("storefront returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("invalid storefront URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("cart storage failed: {0}")]
    Storage(#[from] SnapshotError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no cart item with id {0}")]
    UnknownItem(CartItemId),

    /// The storefront answered 2xx but did not return an order.
    #[error("checkout failed: {0}")]
    CheckoutRejected(String),

    #[error("no items selected for checkout")]
    NothingSelected,
}

pub type Result<T> = std::result::Result<T, CliError>;
