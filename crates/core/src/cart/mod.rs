//! Client-side shopping cart.
//!
//! [`CartContainer`] owns the cart list and the checkout selection, mirrors
//! every change into a [`SnapshotStore`], and publishes immutable
//! [`CartState`] values to subscribers.
//!
//! ```
//! use bazaar_core::cart::{CartContainer, KeyValueSnapshotStore, MemoryBackend, NewCartItem};
//! use bazaar_core::Money;
//!
//! let mut cart = CartContainer::open(KeyValueSnapshotStore::new(MemoryBackend::new()));
//! let id = cart.add_item(NewCartItem {
//!     slug: "oak-desk".to_string(),
//!     name: "Oak Desk".to_string(),
//!     price: Money::from(250),
//!     old_price: Some(Money::from(300)),
//!     image: None,
//!     quantity: 1,
//! });
//! let selection = cart.selection().toggled(id);
//! cart.set_selection(selection);
//! assert_eq!(cart.selected_subtotal(), Money::from(250));
//! ```

mod container;
mod item;
mod notify;
mod selection;
pub mod snapshot;
mod state;

pub use container::{CartContainer, SubscriptionId};
pub use item::{CartItem, NewCartItem};
pub use notify::{CartNotifier, NoopNotifier, Notice};
pub use selection::Selection;
pub use snapshot::{
    CartSnapshot, KeyValueSnapshotStore, MemoryBackend, SnapshotError, SnapshotStore,
    StorageBackend,
};
pub use state::CartState;
