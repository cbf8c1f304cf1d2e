//! Cart line items.

use serde::{Deserialize, Serialize};

use crate::types::{CartItemId, Money};

/// A product line as submitted by "add to cart", before it has an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub slug: String,
    pub name: String,
    pub price: Money,
    /// Reference price shown struck through when it exceeds `price`.
    #[serde(default)]
    pub old_price: Option<Money>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// One line in the cart.
///
/// The `id` is assigned by the container on insertion and is never derived
/// from the product, so the same product added twice yields two lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub slug: String,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub old_price: Option<Money>,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    /// Give a new line its identity. Quantity is floored at 1.
    #[must_use]
    pub fn assign(id: CartItemId, item: NewCartItem) -> Self {
        Self {
            id,
            slug: item.slug,
            name: item.name,
            price: item.price,
            old_price: item.old_price,
            image: item.image,
            quantity: item.quantity.max(1),
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.times(self.quantity)
    }

    /// Discount against the reference price for the whole line, or zero.
    #[must_use]
    pub fn line_savings(&self) -> Money {
        match self.old_price {
            Some(old) if old > self.price => (old - self.price).times(self.quantity),
            _ => Money::ZERO,
        }
    }
}
