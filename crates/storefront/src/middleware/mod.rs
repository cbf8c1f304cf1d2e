//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request spans)
//! 3. Request ID (add unique ID to each request)
//! 4. API headers (no-store, nosniff)
//! 5. Rate limiting on auth routes (governor)

pub mod api_headers;
pub mod bearer;
pub mod rate_limit;
pub mod request_id;

pub use api_headers::api_headers_middleware;
pub use bearer::{AUTH_REQUIRED_MESSAGE, BearerToken, OptionalBearer};
pub use rate_limit::auth_rate_limiter;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
