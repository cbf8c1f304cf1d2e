//! `bazaar cart ...` subcommands.
//!
//! These never touch the network. Each invocation opens the cart from the
//! cart directory, applies one mutation, and the container writes the new
//! snapshot back.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use bazaar_core::cart::{
    CartContainer, CartNotifier, CartState, NewCartItem, Notice, Selection, SnapshotStore,
};
use bazaar_core::{CartItemId, Money};
use clap::Subcommand;

use crate::error::{CliError, Result};

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show the cart and the checkout selection
    Show,
    /// Add a product line
    Add {
        /// Product slug
        slug: String,
        /// Display name
        name: String,
        /// Unit price
        price: Money,
        /// Reference price shown as a discount
        #[arg(long)]
        old_price: Option<Money>,
        /// Image reference
        #[arg(long)]
        image: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a line
    Remove { id: CartItemId },
    /// Increase a line's quantity by one
    Inc { id: CartItemId },
    /// Decrease a line's quantity by one (never below 1)
    Dec { id: CartItemId },
    /// Remove every line
    Clear,
    /// Replace the checkout selection
    Select { ids: Vec<CartItemId> },
    /// Toggle one line in the checkout selection
    Toggle { id: CartItemId },
    /// Select every line
    SelectAll,
}

/// Collects toast messages raised by the container so the command can
/// print them after the mutation.
#[derive(Debug, Clone, Default)]
pub struct Toasts(Rc<RefCell<Vec<String>>>);

impl Toasts {
    pub fn notifier(&self) -> impl Fn(&Notice<'_>) + 'static {
        let queue = Rc::clone(&self.0);
        move |notice: &Notice<'_>| match notice {
            Notice::ItemAdded(item) => {
                tracing::debug!(id = %item.id, slug = %item.slug, "Item added");
                queue.borrow_mut().push(format!("Added {} to cart", item.name));
            }
            Notice::SaveFailed(err) => {
                tracing::warn!(error = %err, "Cart could not be saved");
                queue
                    .borrow_mut()
                    .push("Cart could not be saved; changes may be lost".to_string());
            }
        }
    }

    pub fn drain(&self) -> Vec<String> {
        self.0.borrow_mut().drain(..).collect()
    }
}

/// Apply a cart action and print the result.
///
/// # Errors
///
/// Returns `CliError::UnknownItem` when an id names no line, and I/O errors
/// from writing output.
pub fn run<S, N, W>(
    cart: &mut CartContainer<S, N>,
    toasts: &Toasts,
    action: CartAction,
    out: &mut W,
) -> Result<()>
where
    S: SnapshotStore,
    N: CartNotifier,
    W: Write,
{
    match action {
        CartAction::Show => {}
        CartAction::Add {
            slug,
            name,
            price,
            old_price,
            image,
            quantity,
        } => {
            cart.add_item(NewCartItem {
                slug,
                name,
                price,
                old_price,
                image,
                quantity,
            });
        }
        CartAction::Remove { id } => {
            require(cart, &id)?;
            cart.remove_item(&id);
        }
        CartAction::Inc { id } => {
            require(cart, &id)?;
            cart.increase_quantity(&id);
        }
        CartAction::Dec { id } => {
            require(cart, &id)?;
            cart.decrease_quantity(&id);
        }
        CartAction::Clear => cart.clear(),
        CartAction::Select { ids } => {
            if let Some(unknown) = ids.iter().find(|id| cart.item(id).is_none()) {
                return Err(CliError::UnknownItem(*unknown));
            }
            cart.set_selection(ids.into_iter().collect());
        }
        CartAction::Toggle { id } => {
            require(cart, &id)?;
            let selection = cart.selection().toggled(id);
            cart.set_selection(selection);
        }
        CartAction::SelectAll => {
            let selection = Selection::with_all(cart.items());
            cart.set_selection(selection);
        }
    }

    for toast in toasts.drain() {
        writeln!(out, "{toast}")?;
    }
    render(&cart.state(), out)
}

fn require<S: SnapshotStore, N: CartNotifier>(
    cart: &CartContainer<S, N>,
    id: &CartItemId,
) -> Result<()> {
    match cart.item(id) {
        Some(_) => Ok(()),
        None => Err(CliError::UnknownItem(*id)),
    }
}

/// Print every line with its selection mark, then the totals.
///
/// # Errors
///
/// Returns I/O errors from writing output.
pub fn render<W: Write>(state: &CartState, out: &mut W) -> Result<()> {
    if state.is_empty() {
        writeln!(out, "Your cart is empty.")?;
        return Ok(());
    }

    for item in state.items() {
        let mark = if state.selection().contains(&item.id) {
            "[x]"
        } else {
            "[ ]"
        };
        write!(
            out,
            "{mark} {id}  {name}  {qty} x {price} = {total}",
            id = item.id,
            name = item.name,
            qty = item.quantity,
            price = item.price,
            total = item.line_total(),
        )?;
        if let Some(old) = item.old_price.filter(|old| *old > item.price) {
            write!(out, "  (was {old})")?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "{} line(s), {} item(s), subtotal {}",
        state.item_count(),
        state.total_quantity(),
        state.subtotal()
    )?;
    writeln!(
        out,
        "Selected: {} line(s), subtotal {}, you save {}",
        state.selection().len(),
        state.selected_subtotal(),
        state.selected_savings()
    )?;
    Ok(())
}
