//! `bazaar checkout`: place the selected lines as an order.

use std::io::Write;

use bazaar_core::CartItemId;
use bazaar_core::api::ApiEnvelope;
use bazaar_core::cart::{CartContainer, CartNotifier, CartState, SnapshotStore};
use bazaar_core::order::{CheckoutRequest, CustomerDetails, OrderLine, PlacedOrder};

use crate::client::ApiClient;
use crate::error::{CliError, Result};

/// Build the order request from the selected lines.
///
/// Returns the request together with the ids of the lines it covers, so
/// exactly those can be removed once the order is accepted.
///
/// # Errors
///
/// Returns `CliError::NothingSelected` when the selection is empty.
pub fn build_request(
    state: &CartState,
    customer: CustomerDetails,
) -> Result<(CheckoutRequest, Vec<CartItemId>)> {
    let (lines, ids): (Vec<OrderLine>, Vec<CartItemId>) = state
        .selected_items()
        .map(|item| (OrderLine::from(item), item.id))
        .unzip();
    if lines.is_empty() {
        return Err(CliError::NothingSelected);
    }
    Ok((CheckoutRequest { customer, lines }, ids))
}

/// Take the placed order out of a checkout response.
///
/// # Errors
///
/// Returns `CliError::CheckoutRejected` when the envelope carries no order.
pub fn accepted_order(envelope: ApiEnvelope<PlacedOrder>) -> Result<PlacedOrder> {
    envelope.data.ok_or_else(|| {
        CliError::CheckoutRejected(
            envelope
                .message
                .unwrap_or_else(|| "order was not accepted".to_string()),
        )
    })
}

/// Submit the selected lines and drop them from the cart on success.
///
/// # Errors
///
/// Returns an error if nothing is selected or the storefront rejects the
/// order. The cart is left untouched on failure.
pub async fn run<S, N, W>(
    cart: &mut CartContainer<S, N>,
    client: &ApiClient,
    customer: CustomerDetails,
    out: &mut W,
) -> Result<()>
where
    S: SnapshotStore,
    N: CartNotifier,
    W: Write,
{
    let (request, ordered) = build_request(&cart.state(), customer)?;

    let envelope = client
        .post::<_, PlacedOrder>("api/checkout/orders", &request)
        .await?;
    let order = accepted_order(envelope)?;

    for id in &ordered {
        cart.remove_item(id);
    }
    tracing::info!(order_id = %order.id, lines = ordered.len(), "Order placed");

    writeln!(out, "Order {} placed ({})", order.id, order.status)?;
    for line in &order.lines {
        writeln!(
            out,
            "  {} x {} = {}",
            line.quantity,
            line.name,
            line.line_total()
        )?;
    }
    writeln!(out, "Subtotal: {}", order.subtotal)?;
    Ok(())
}
