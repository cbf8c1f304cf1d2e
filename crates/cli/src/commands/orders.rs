//! `bazaar orders`: the signed-in customer's order history.

use std::io::Write;

use bazaar_core::api::{Listing, OrderSummary};

use crate::client::ApiClient;
use crate::error::Result;

/// Fetch and print order history.
///
/// # Errors
///
/// Returns the request error after printing a failure line.
pub async fn history<W: Write>(client: &ApiClient, token: &str, out: &mut W) -> Result<()> {
    let listing = match client
        .get::<Listing<OrderSummary>>("api/orders", &[], Some(token))
        .await
    {
        Ok(envelope) => envelope.data,
        Err(e) => {
            writeln!(out, "Failed to load orders.")?;
            return Err(e);
        }
    };

    let Some(listing) = listing.filter(|l| !l.items.is_empty()) else {
        writeln!(out, "No record found.")?;
        return Ok(());
    };

    for order in &listing.items {
        write!(
            out,
            "{:<16} {:<12} {:>10}  {}",
            order.order_no, order.status, order.total, order.placed_at
        )?;
        if let Some(count) = order.item_count {
            write!(out, "  ({count} item(s))")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
