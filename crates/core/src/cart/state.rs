//! Immutable cart state snapshots.

use super::item::CartItem;
use super::selection::Selection;
use crate::types::{CartItemId, Money};

/// The cart as observed by consumers.
///
/// The container never mutates a published `CartState`; each change builds a
/// new value and swaps it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub(crate) items: Vec<CartItem>,
    pub(crate) selection: Selection,
}

impl CartState {
    /// Build a state, enforcing the line and selection invariants.
    ///
    /// Duplicate identities keep their first occurrence, quantities are
    /// floored at 1, and selection members without a line are dropped.
    #[must_use]
    pub fn new(items: Vec<CartItem>, selection: Selection) -> Self {
        let mut lines: Vec<CartItem> = Vec::with_capacity(items.len());
        for mut item in items {
            if lines.iter().any(|existing| existing.id == item.id) {
                continue;
            }
            item.quantity = item.quantity.max(1);
            lines.push(item);
        }
        let selection = selection.restricted_to(&lines);
        Self {
            items: lines,
            selection,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub fn item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of lines.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Lines currently selected for checkout, in cart order.
    pub fn selected_items(&self) -> impl Iterator<Item = &CartItem> {
        self.items
            .iter()
            .filter(|item| self.selection.contains(&item.id))
    }

    /// Total of every line.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Total of the selected lines only.
    #[must_use]
    pub fn selected_subtotal(&self) -> Money {
        self.selected_items().map(CartItem::line_total).sum()
    }

    /// Discount against reference prices across the selected lines.
    #[must_use]
    pub fn selected_savings(&self) -> Money {
        self.selected_items().map(CartItem::line_savings).sum()
    }
}
