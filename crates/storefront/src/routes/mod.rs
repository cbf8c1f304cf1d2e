//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! # Auth (login/signup rate limited)
//! POST /api/auth/login             - Relay login
//! POST /api/auth/signup            - Relay signup
//! POST /api/auth/logout            - Relay logout (bearer)
//! GET  /api/auth/profile           - Profile (bearer)
//! POST /api/auth/profile           - Update profile (bearer)
//!
//! # Catalog
//! GET  /api/products               - Product listing (envelope)
//! GET  /api/products/search        - Product search (envelope)
//! GET  /api/products/{slug}        - Product detail
//! GET  /api/categories             - Categories
//! GET  /api/banners                - Banners
//! GET  /api/pages/{slug}           - CMS page
//!
//! # Customer (bearer)
//! GET  /api/orders                 - Order history (envelope)
//! GET  /api/orders/{order_no}      - Order detail
//! POST /api/coupons/apply          - Apply coupon (envelope)
//! GET  /api/wishlist               - Wishlist
//! GET  /api/wishlist/check         - Wishlist membership (envelope)
//! POST /api/wishlist               - Toggle wishlist item
//! POST /api/warranty/activate      - Activate warranty
//! POST /api/warranty/claim         - File warranty claim
//! GET  /api/warranty               - Warranty list
//!
//! # Dealer
//! GET  /api/dealer/products        - Dealer catalog (bearer)
//! GET  /api/dealer/orders          - Dealer orders (bearer)
//! POST /api/dealer/apply           - Dealer application
//!
//! # Misc
//! POST /api/contact                - Contact form (envelope)
//! POST /api/checkout/orders        - Place order in the local order file
//! GET  /api/checkout/orders/{id}   - Read a locally placed order
//! ```

pub mod auth;
pub mod checkout;
pub mod contact;
pub mod content;
pub mod coupons;
pub mod dealer;
pub mod orders;
pub mod products;
pub mod warranty;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::auth_rate_limiter;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .layer(auth_rate_limiter());

    Router::new()
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile).post(auth::update_profile))
        .merge(limited)
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/search", get(products::search))
        .route("/{slug}", get(products::show))
}

/// Create the order history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::history))
        .route("/{order_no}", get(orders::show))
}

/// Create the wishlist routes router.
pub fn wishlist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(wishlist::index).post(wishlist::toggle))
        .route("/check", get(wishlist::check))
}

/// Create the warranty routes router.
pub fn warranty_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(warranty::index))
        .route("/activate", post(warranty::activate))
        .route("/claim", post(warranty::claim))
}

/// Create the dealer routes router.
pub fn dealer_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(dealer::products))
        .route("/orders", get(dealer::orders))
        .route("/apply", post(dealer::apply))
}

/// Create the local checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(checkout::place))
        .route("/orders/{id}", get(checkout::show))
}

/// Create every `/api` route.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .route("/categories", get(content::categories))
        .route("/banners", get(content::banners))
        .route("/pages/{slug}", get(content::page))
        .nest("/orders", order_routes())
        .route("/coupons/apply", post(coupons::apply))
        .nest("/wishlist", wishlist_routes())
        .route("/contact", post(contact::submit))
        .nest("/warranty", warranty_routes())
        .nest("/dealer", dealer_routes())
        .nest("/checkout", checkout_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}
