//! The set of cart lines marked for checkout.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::item::CartItem;
use crate::types::CartItemId;

/// Cart line identities selected for checkout.
///
/// The container only exposes whole-set replacement, so toggling and
/// "select all" are computed here and handed back via
/// [`CartContainer::set_selection`](super::CartContainer::set_selection).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<CartItemId>);

impl Selection {
    /// An empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: &CartItemId) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartItemId> {
        self.0.iter()
    }

    /// A copy with `id` flipped in or out.
    #[must_use]
    pub fn toggled(&self, id: CartItemId) -> Self {
        let mut next = self.0.clone();
        if !next.remove(&id) {
            next.insert(id);
        }
        Self(next)
    }

    /// A selection of every line in `items`.
    #[must_use]
    pub fn with_all(items: &[CartItem]) -> Self {
        items.iter().map(|item| item.id).collect()
    }

    /// Drop members that do not name one of `items`.
    #[must_use]
    pub fn restricted_to(mut self, items: &[CartItem]) -> Self {
        self.0.retain(|id| items.iter().any(|item| item.id == *id));
        self
    }

    pub(crate) fn remove(&mut self, id: &CartItemId) {
        self.0.remove(id);
    }
}

impl FromIterator<CartItemId> for Selection {
    fn from_iter<I: IntoIterator<Item = CartItemId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let id = CartItemId::generate();
        let once = Selection::new().toggled(id);
        assert!(once.contains(&id));
        assert!(once.toggled(id).is_empty());
    }

    #[test]
    fn test_restricted_to_drops_unknown() {
        let known = CartItemId::generate();
        let stale = CartItemId::generate();
        let items = vec![CartItem {
            id: known,
            slug: "s".to_string(),
            name: "n".to_string(),
            price: crate::Money::from(1),
            old_price: None,
            image: None,
            quantity: 1,
        }];
        let selection: Selection = [known, stale].into_iter().collect();
        let restricted = selection.restricted_to(&items);
        assert_eq!(restricted.len(), 1);
        assert!(restricted.contains(&known));
    }
}
