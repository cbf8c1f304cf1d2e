//! Typed schemas for backend responses that the storefront reshapes.
//!
//! The reshaped client-facing types live in [`bazaar_core::api`].
//!
//! Routes that relay the backend body verbatim never decode it. Routes that
//! reshape it decode into these types first, so a schema change upstream
//! surfaces as a decode error rather than an empty page.

use bazaar_core::Money;
use bazaar_core::api::Listing;
use serde::Deserialize;

// =============================================================================
// Listings
// =============================================================================

/// The backend's paged list wrapper: `{ "data": [ { "info_rows": [...] } ] }`.
///
/// The outer `data` array holds one page per result set; the storefront
/// only ever asks for one.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamList<T> {
    pub data: Vec<UpstreamPage<T>>,
}

/// One result set inside [`UpstreamList`].
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamPage<T> {
    pub info_rows: Vec<T>,
    #[serde(default)]
    pub total_rows: Option<u64>,
}

impl<T> From<UpstreamList<T>> for Listing<T> {
    fn from(list: UpstreamList<T>) -> Self {
        let mut items = Vec::new();
        let mut reported: Option<u64> = None;
        for page in list.data {
            if let Some(total) = page.total_rows {
                reported = Some(reported.unwrap_or(0) + total);
            }
            items.extend(page.info_rows);
        }
        let total = reported.unwrap_or_else(|| u64::try_from(items.len()).unwrap_or(u64::MAX));
        Self { items, total }
    }
}

// =============================================================================
// Coupons
// =============================================================================

/// Backend verdict on a coupon code.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCoupon {
    pub valid: bool,
    pub code: String,
    #[serde(default)]
    pub discount: Option<Money>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Wishlist
// =============================================================================

/// Backend answer to "is this product on the wishlist".
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamWishlistCheck {
    pub in_wishlist: bool,
}
