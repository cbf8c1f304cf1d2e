//! Checkout requests and locally placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartItem;
use crate::types::{Email, EmailError, Money, OrderId, OrderStatus};

/// Reasons a checkout request is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("order must contain at least one item")]
    NoLines,

    #[error("quantity for {0} must be at least 1")]
    ZeroQuantity(String),

    #[error("price for {0} must not be negative")]
    InvalidPrice(String),

    #[error("order total is out of range")]
    AmountOutOfRange,

    #[error("customer name is required")]
    MissingName,

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// Contact and delivery details as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// One product line in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub slug: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl OrderLine {
    /// Display total for the line, saturating on overflow.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }

    /// Exact total for the line, or `None` if it overflows.
    #[must_use]
    pub fn checked_line_total(&self) -> Option<Money> {
        self.unit_price.checked_times(self.quantity)
    }
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            slug: item.slug.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity: item.quantity,
        }
    }
}

/// Body of `POST /api/checkout/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLine>,
}

/// Validated customer details stored with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// An order recorded by the local checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub placed_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
    pub subtotal: Money,
}

impl CheckoutRequest {
    /// Validate the request and turn it into a pending order.
    ///
    /// The subtotal is recomputed from the lines; whatever the client
    /// believes the total to be is not trusted.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] if there are no lines, a line has zero
    /// quantity or a negative price, the subtotal overflows, the name is
    /// blank, or the email is invalid.
    pub fn into_order(
        self,
        id: OrderId,
        placed_at: DateTime<Utc>,
    ) -> Result<PlacedOrder, CheckoutError> {
        if self.lines.is_empty() {
            return Err(CheckoutError::NoLines);
        }
        if let Some(line) = self.lines.iter().find(|line| line.quantity == 0) {
            return Err(CheckoutError::ZeroQuantity(line.slug.clone()));
        }
        if let Some(line) = self.lines.iter().find(|line| line.unit_price.is_negative()) {
            return Err(CheckoutError::InvalidPrice(line.slug.clone()));
        }
        let subtotal = self
            .lines
            .iter()
            .try_fold(Money::ZERO, |acc, line| {
                line.checked_line_total()
                    .and_then(|total| acc.checked_add(total))
            })
            .ok_or(CheckoutError::AmountOutOfRange)?;

        let name = self.customer.name.trim().to_string();
        if name.is_empty() {
            return Err(CheckoutError::MissingName);
        }
        let email = Email::parse(&self.customer.email)?;

        Ok(PlacedOrder {
            id,
            placed_at,
            status: OrderStatus::Pending,
            customer: Customer {
                name,
                email,
                phone: non_blank(self.customer.phone),
                address: non_blank(self.customer.address),
            },
            lines: self.lines,
            subtotal,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(lines: Vec<OrderLine>) -> CheckoutRequest {
        CheckoutRequest {
            customer: CustomerDetails {
                name: " Ada Lovelace ".to_string(),
                email: "ADA@example.com".to_string(),
                phone: Some("  ".to_string()),
                address: Some("12 Analytical Row".to_string()),
            },
            lines,
        }
    }

    fn line(slug: &str, price: u32, quantity: u32) -> OrderLine {
        OrderLine {
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            unit_price: Money::from(price),
            quantity,
        }
    }

    #[test]
    fn test_into_order_computes_subtotal() {
        let order = request(vec![line("a", 100, 2), line("b", 15, 1)])
            .into_order(OrderId::generate(), Utc::now())
            .unwrap();
        assert_eq!(order.subtotal, Money::from(215));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer.name, "Ada Lovelace");
        assert_eq!(order.customer.email.as_str(), "ada@example.com");
        assert_eq!(order.customer.phone, None);
    }

    #[test]
    fn test_rejects_empty_order() {
        let err = request(vec![])
            .into_order(OrderId::generate(), Utc::now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::NoLines);
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let err = request(vec![line("a", 1, 0)])
            .into_order(OrderId::generate(), Utc::now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::ZeroQuantity("a".to_string()));
    }

    #[test]
    fn test_rejects_negative_price() {
        let mut bad = line("refund", 0, 1);
        bad.unit_price = "-500".parse().unwrap();
        let err = request(vec![line("a", 10, 1), bad])
            .into_order(OrderId::generate(), Utc::now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::InvalidPrice("refund".to_string()));
    }

    #[test]
    fn test_free_line_is_accepted() {
        let order = request(vec![line("gift", 0, 1)])
            .into_order(OrderId::generate(), Utc::now())
            .unwrap();
        assert_eq!(order.subtotal, Money::ZERO);
    }

    #[test]
    fn test_line_overflow_is_rejected() {
        let mut huge = line("vault", 0, 2);
        huge.unit_price = Money::new(rust_decimal::Decimal::MAX);
        let err = request(vec![huge])
            .into_order(OrderId::generate(), Utc::now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::AmountOutOfRange);
    }

    #[test]
    fn test_subtotal_overflow_is_rejected() {
        let mut a = line("a", 0, 1);
        a.unit_price = Money::new(rust_decimal::Decimal::MAX);
        let err = request(vec![a.clone(), a])
            .into_order(OrderId::generate(), Utc::now())
            .unwrap_err();
        assert_eq!(err, CheckoutError::AmountOutOfRange);
    }

    #[test]
    fn test_rejects_bad_email() {
        let mut req = request(vec![line("a", 1, 1)]);
        req.customer.email = "nobody".to_string();
        let err = req.into_order(OrderId::generate(), Utc::now()).unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidEmail(_)));
    }
}
