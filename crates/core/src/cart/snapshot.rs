//! Persisted cart snapshots.
//!
//! The cart is mirrored into a string key/value store under two fixed keys,
//! each holding a JSON array:
//!
//! - [`CART_KEY`] - the line items
//! - [`SELECTION_KEY`] - the selected line identities
//!
//! Loading fails open: a missing, unreadable, or malformed value is read as
//! an empty list. There is no versioning.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::item::CartItem;
use super::selection::Selection;
use super::state::CartState;
use crate::types::CartItemId;

/// Storage key for the line items.
pub const CART_KEY: &str = "cart";

/// Storage key for the selected line identities.
pub const SELECTION_KEY: &str = "selectedItems";

/// Errors raised while writing a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage backend unavailable: {0}")]
    Backend(String),
}

/// The serialized form of the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub selection: Selection,
}

impl From<&CartState> for CartSnapshot {
    fn from(state: &CartState) -> Self {
        Self {
            items: state.items.clone(),
            selection: state.selection.clone(),
        }
    }
}

impl From<CartSnapshot> for CartState {
    fn from(snapshot: CartSnapshot) -> Self {
        Self::new(snapshot.items, snapshot.selection)
    }
}

/// Where the container keeps its snapshot.
pub trait SnapshotStore {
    /// Read the saved snapshot, or `None` if nothing usable is stored.
    fn load(&self) -> Option<CartSnapshot>;

    /// Replace the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the snapshot cannot be encoded or written.
    fn save(&self, snapshot: &CartSnapshot) -> Result<(), SnapshotError>;
}

/// A string key/value store with local-storage semantics.
pub trait StorageBackend {
    /// Read a key.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, SnapshotError>;

    /// Write a key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), SnapshotError>;
}

/// Snapshot store laid out over a [`StorageBackend`] using the fixed keys.
#[derive(Debug, Clone)]
pub struct KeyValueSnapshotStore<B> {
    backend: B,
}

impl<B: StorageBackend> KeyValueSnapshotStore<B> {
    #[must_use]
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Read a JSON array under `key`, treating anything unusable as empty.
    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        self.backend
            .get_item(key)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str::<Vec<T>>(&raw).ok())
            .unwrap_or_default()
    }
}

impl<B: StorageBackend> SnapshotStore for KeyValueSnapshotStore<B> {
    fn load(&self) -> Option<CartSnapshot> {
        let items: Vec<CartItem> = self.read_list(CART_KEY);
        let selected: Vec<CartItemId> = self.read_list(SELECTION_KEY);
        if items.is_empty() && selected.is_empty() {
            return None;
        }
        let state = CartState::new(items, selected.into_iter().collect());
        Some(CartSnapshot::from(&state))
    }

    fn save(&self, snapshot: &CartSnapshot) -> Result<(), SnapshotError> {
        let items = serde_json::to_string(&snapshot.items)?;
        let selection = serde_json::to_string(&snapshot.selection)?;
        self.backend.set_item(CART_KEY, &items)?;
        self.backend.set_item(SELECTION_KEY, &selection)
    }
}

/// In-process storage backend.
///
/// Clones share the same map, so a test can keep a handle while the
/// container owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| SnapshotError::Backend("memory store poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SnapshotError::Backend("memory store poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
