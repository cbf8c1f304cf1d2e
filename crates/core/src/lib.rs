//! Bazaar Core - Shared types and the client-side cart.
//!
//! This crate provides the pieces shared by every Bazaar component:
//! - `storefront` - API routes proxying to the commerce backend
//! - `cli` - Terminal client that owns the shopping cart
//!
//! # Architecture
//!
//! The core crate performs no network or file I/O. Persistence is reached
//! through the [`cart::StorageBackend`] trait so callers choose where the
//! cart snapshot lives.
//!
//! # Modules
//!
//! - [`types`] - Newtypes for tokens, money, emails, and statuses
//! - [`cart`] - Cart state container and snapshot persistence
//! - [`api`] - JSON envelope returned by the storefront API
//! - [`order`] - Checkout request and placed order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod order;
pub mod types;

pub use types::*;
