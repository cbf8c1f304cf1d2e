//! `bazaar products` and `bazaar search`.

use std::io::Write;

use bazaar_core::api::{Listing, ProductSummary};

use crate::client::ApiClient;
use crate::error::Result;

/// List products, optionally filtered by category.
///
/// # Errors
///
/// Returns the request error after printing a failure line.
pub async fn products<W: Write>(
    client: &ApiClient,
    category: Option<String>,
    page: Option<u32>,
    out: &mut W,
) -> Result<()> {
    let mut query = Vec::new();
    if let Some(category) = category {
        query.push(("category", category));
    }
    if let Some(page) = page {
        query.push(("page", page.to_string()));
    }

    match client
        .get::<Listing<ProductSummary>>("api/products", &query, None)
        .await
    {
        Ok(envelope) => render(envelope.data, out),
        Err(e) => {
            writeln!(out, "Failed to load products.")?;
            Err(e)
        }
    }
}

/// Search products by free text.
///
/// # Errors
///
/// Returns the request error after printing a failure line.
pub async fn search<W: Write>(client: &ApiClient, q: String, out: &mut W) -> Result<()> {
    match client
        .get::<Listing<ProductSummary>>("api/products/search", &[("q", q)], None)
        .await
    {
        Ok(envelope) => render(envelope.data, out),
        Err(e) => {
            writeln!(out, "Failed to load search results.")?;
            Err(e)
        }
    }
}

/// Print one product per line.
///
/// # Errors
///
/// Returns I/O errors from writing output.
pub fn render<W: Write>(listing: Option<Listing<ProductSummary>>, out: &mut W) -> Result<()> {
    let Some(listing) = listing.filter(|l| !l.items.is_empty()) else {
        writeln!(out, "No products found.")?;
        return Ok(());
    };

    for product in &listing.items {
        write!(out, "{:<32} {:>10}", product.name, product.price)?;
        if let Some(old) = product.old_price.filter(|old| *old > product.price) {
            write!(out, "  (was {old})")?;
        }
        if product.in_stock == Some(false) {
            write!(out, "  out of stock")?;
        }
        writeln!(out, "  [{}]", product.slug)?;
    }
    writeln!(out, "Showing {} of {}", listing.items.len(), listing.total)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Money;

    use super::*;

    #[test]
    fn test_render_empty() {
        let mut out = Vec::new();
        render(None, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No products found.\n");
    }

    #[test]
    fn test_render_marks_discount_and_stock() {
        let listing = Listing {
            items: vec![ProductSummary {
                slug: "oak-desk".to_string(),
                name: "Oak Desk".to_string(),
                price: Money::from(250),
                old_price: Some(Money::from(300)),
                image: None,
                category: None,
                in_stock: Some(false),
            }],
            total: 12,
        };
        let mut out = Vec::new();
        render(Some(listing), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("(was 300.00)"));
        assert!(text.contains("out of stock"));
        assert!(text.ends_with("Showing 1 of 12\n"));
    }
}
