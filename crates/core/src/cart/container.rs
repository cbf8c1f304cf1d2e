//! The cart state container.

use std::sync::Arc;

use super::item::{CartItem, NewCartItem};
use super::notify::{CartNotifier, Notice, NoopNotifier};
use super::selection::Selection;
use super::snapshot::{CartSnapshot, SnapshotStore};
use super::state::CartState;
use crate::types::{CartItemId, Money};

/// Handle returned by [`CartContainer::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&Arc<CartState>)>;

/// Single source of truth for the shopping cart during a client session.
///
/// Mutations take `&mut self`, so there is exactly one writer. Each mutation
/// builds a new [`CartState`], swaps it in, writes the full snapshot to the
/// store, and then calls every subscriber with the new state. Readers that
/// hold an earlier `Arc<CartState>` keep seeing the state they were given.
///
/// No operation returns an error. A failed snapshot write is reported to the
/// notifier as [`Notice::SaveFailed`] and otherwise ignored.
pub struct CartContainer<S, N = NoopNotifier> {
    state: Arc<CartState>,
    store: S,
    notifier: N,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: SnapshotStore> CartContainer<S> {
    /// Open a container without notifications.
    #[must_use]
    pub fn open(store: S) -> Self {
        Self::with_notifier(store, NoopNotifier)
    }
}

impl<S: SnapshotStore, N: CartNotifier> CartContainer<S, N> {
    /// Open a container, reading the saved snapshot once.
    ///
    /// A missing or corrupt snapshot yields an empty cart.
    #[must_use]
    pub fn with_notifier(store: S, notifier: N) -> Self {
        let state = store.load().map(CartState::from).unwrap_or_default();
        Self {
            state: Arc::new(state),
            store,
            notifier,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// The current state snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<CartState> {
        Arc::clone(&self.state)
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        self.state.items()
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        self.state.selection()
    }

    #[must_use]
    pub fn item(&self, id: &CartItemId) -> Option<&CartItem> {
        self.state.item(id)
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.state.item_count()
    }

    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.state.total_quantity()
    }

    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.state.subtotal()
    }

    #[must_use]
    pub fn selected_subtotal(&self) -> Money {
        self.state.selected_subtotal()
    }

    #[must_use]
    pub fn selected_savings(&self) -> Money {
        self.state.selected_savings()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Append a new line with a fresh identity and raise a toast.
    pub fn add_item(&mut self, item: NewCartItem) -> CartItemId {
        let id = self.fresh_id();
        let line = CartItem::assign(id, item);

        let mut next = (*self.state).clone();
        next.items.push(line);
        self.commit(next);

        if let Some(added) = self.state.item(&id) {
            self.notifier.notify(&Notice::ItemAdded(added));
        }
        id
    }

    /// Remove a line and drop it from the selection. No-op if absent.
    pub fn remove_item(&mut self, id: &CartItemId) {
        if self.state.item(id).is_none() && !self.state.selection.contains(id) {
            return;
        }
        let mut next = (*self.state).clone();
        next.items.retain(|item| item.id != *id);
        next.selection.remove(id);
        self.commit(next);
    }

    /// Add one to a line's quantity. No-op if absent.
    pub fn increase_quantity(&mut self, id: &CartItemId) {
        self.adjust(id, |quantity| quantity.saturating_add(1));
    }

    /// Subtract one from a line's quantity, never going below 1.
    /// No-op if absent or already at 1.
    pub fn decrease_quantity(&mut self, id: &CartItemId) {
        self.adjust(id, |quantity| quantity.saturating_sub(1).max(1));
    }

    /// Empty the cart and the selection.
    pub fn clear(&mut self) {
        self.commit(CartState::default());
    }

    /// Replace the whole selection. Ids without a matching line are dropped.
    pub fn set_selection(&mut self, selection: Selection) {
        let mut next = (*self.state).clone();
        next.selection = selection.restricted_to(&next.items);
        self.commit(next);
    }

    // -------------------------------------------------------------------------
    // Subscriptions
    // -------------------------------------------------------------------------

    /// Call `callback` with the new state after every mutation.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Arc<CartState>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Stop calling a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn fresh_id(&self) -> CartItemId {
        loop {
            let id = CartItemId::generate();
            if self.state.item(&id).is_none() {
                return id;
            }
        }
    }

    fn adjust(&mut self, id: &CartItemId, step: impl Fn(u32) -> u32) {
        let Some(current) = self.state.item(id).map(|item| item.quantity) else {
            return;
        };
        let quantity = step(current);
        if quantity == current {
            return;
        }
        let mut next = (*self.state).clone();
        if let Some(line) = next.items.iter_mut().find(|item| item.id == *id) {
            line.quantity = quantity;
        }
        self.commit(next);
    }

    fn commit(&mut self, next: CartState) {
        self.state = Arc::new(next);

        if let Err(err) = self.store.save(&CartSnapshot::from(self.state.as_ref())) {
            self.notifier.notify(&Notice::SaveFailed(&err));
        }

        for (_, subscriber) in &self.subscribers {
            subscriber(&self.state);
        }
    }
}

impl<S, N> std::fmt::Debug for CartContainer<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartContainer")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::cart::snapshot::{
        CART_KEY, KeyValueSnapshotStore, MemoryBackend, SELECTION_KEY, SnapshotError,
        StorageBackend,
    };

    fn product(name: &str, price: u32) -> NewCartItem {
        NewCartItem {
            slug: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            price: Money::from(price),
            old_price: None,
            image: Some(format!("/images/{}.jpg", name.to_lowercase())),
            quantity: 1,
        }
    }

    fn memory_cart() -> (CartContainer<KeyValueSnapshotStore<MemoryBackend>>, MemoryBackend) {
        let backend = MemoryBackend::new();
        let cart = CartContainer::open(KeyValueSnapshotStore::new(backend.clone()));
        (cart, backend)
    }

    fn stored_array(backend: &MemoryBackend, key: &str) -> Vec<serde_json::Value> {
        let raw = backend.get_item(key).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_add_assigns_unique_ids() {
        let (mut cart, _) = memory_cart();
        let ids: Vec<_> = (0..25).map(|_| cart.add_item(product("Chair", 40))).collect();

        assert_eq!(cart.item_count(), 25);
        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_same_product_twice_is_two_lines() {
        let (mut cart, _) = memory_cart();
        let a = cart.add_item(product("Chair", 40));
        let b = cart.add_item(product("Chair", 40));
        assert_ne!(a, b);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_decrease_never_below_one() {
        let (mut cart, _) = memory_cart();
        let id = cart.add_item(product("Lamp", 15));
        cart.increase_quantity(&id);
        for _ in 0..10 {
            cart.decrease_quantity(&id);
        }
        assert_eq!(cart.item(&id).unwrap().quantity, 1);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let (mut cart, _) = memory_cart();
        cart.add_item(product("Lamp", 15));
        let before = cart.state();
        let ghost = CartItemId::generate();

        cart.increase_quantity(&ghost);
        cart.decrease_quantity(&ghost);
        cart.remove_item(&ghost);

        assert_eq!(*cart.state(), *before);
    }

    #[test]
    fn test_remove_drops_selection() {
        let (mut cart, _) = memory_cart();
        let a = cart.add_item(product("Desk", 120));
        let b = cart.add_item(product("Shelf", 60));
        cart.set_selection([a, b].into_iter().collect());

        cart.remove_item(&a);

        assert!(!cart.selection().contains(&a));
        assert!(cart.selection().contains(&b));
        assert!(cart.item(&a).is_none());
    }

    #[test]
    fn test_clear_writes_empty_arrays() {
        let (mut cart, backend) = memory_cart();
        let a = cart.add_item(product("Desk", 120));
        cart.set_selection(Selection::new().toggled(a));

        cart.clear();

        assert!(stored_array(&backend, CART_KEY).is_empty());
        assert!(stored_array(&backend, SELECTION_KEY).is_empty());
        assert!(cart.items().is_empty());
        assert!(cart.selection().is_empty());
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (mut cart, backend) = memory_cart();
        let id = cart.add_item(product("Desk", 120));
        assert_eq!(stored_array(&backend, CART_KEY).len(), 1);

        cart.increase_quantity(&id);
        assert_eq!(stored_array(&backend, CART_KEY)[0]["quantity"], 2);

        cart.set_selection(Selection::new().toggled(id));
        assert_eq!(stored_array(&backend, SELECTION_KEY).len(), 1);
    }

    #[test]
    fn test_corrupt_snapshot_opens_empty() {
        let backend = MemoryBackend::new();
        backend.set_item(CART_KEY, "definitely not json").unwrap();
        backend.set_item(SELECTION_KEY, "{\"a\":1}").unwrap();

        let cart = CartContainer::open(KeyValueSnapshotStore::new(backend));
        assert!(cart.items().is_empty());
        assert!(cart.selection().is_empty());
    }

    #[test]
    fn test_reopen_restores_cart() {
        let (mut cart, backend) = memory_cart();
        let id = cart.add_item(product("Desk", 120));
        cart.increase_quantity(&id);
        cart.set_selection(Selection::new().toggled(id));
        drop(cart);

        let reopened = CartContainer::open(KeyValueSnapshotStore::new(backend));
        assert_eq!(reopened.item(&id).unwrap().quantity, 2);
        assert!(reopened.selection().contains(&id));
    }

    #[test]
    fn test_selected_subtotal_ignores_unselected() {
        let (mut cart, _) = memory_cart();
        let a = cart.add_item(product("Item A", 100));
        let _b = cart.add_item(product("Item B", 200));
        cart.set_selection(Selection::new().toggled(a));
        cart.increase_quantity(&a);

        assert_eq!(cart.selected_subtotal(), Money::from(200));
        assert_eq!(cart.subtotal(), Money::from(400));
    }

    #[test]
    fn test_set_selection_drops_unknown_ids() {
        let (mut cart, _) = memory_cart();
        let a = cart.add_item(product("Desk", 120));
        let ghost = CartItemId::generate();
        cart.set_selection([a, ghost].into_iter().collect());
        assert_eq!(cart.selection().len(), 1);
    }

    #[test]
    fn test_add_raises_toast() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let notifier = move |notice: &Notice<'_>| {
            if let Notice::ItemAdded(item) = notice {
                sink.borrow_mut().push(item.name.clone());
            }
        };
        let mut cart =
            CartContainer::with_notifier(KeyValueSnapshotStore::new(MemoryBackend::new()), notifier);

        cart.add_item(product("Rug", 80));
        cart.clear();

        assert_eq!(*seen.borrow(), vec!["Rug".to_string()]);
    }

    #[test]
    fn test_subscribers_see_each_state() {
        let (mut cart, _) = memory_cart();
        let calls = Rc::new(Cell::new(0));
        let last_count = Rc::new(Cell::new(0));
        let sub = {
            let calls = Rc::clone(&calls);
            let last_count = Rc::clone(&last_count);
            cart.subscribe(move |state| {
                calls.set(calls.get() + 1);
                last_count.set(state.item_count());
            })
        };

        cart.add_item(product("Rug", 80));
        cart.add_item(product("Vase", 30));
        assert_eq!(calls.get(), 2);
        assert_eq!(last_count.get(), 2);

        assert!(cart.unsubscribe(sub));
        cart.clear();
        assert_eq!(calls.get(), 2);
        assert!(!cart.unsubscribe(sub));
    }

    #[test]
    fn test_published_state_is_not_mutated() {
        let (mut cart, _) = memory_cart();
        let id = cart.add_item(product("Rug", 80));
        let earlier = cart.state();
        cart.increase_quantity(&id);
        assert_eq!(earlier.item(&id).unwrap().quantity, 1);
        assert_eq!(cart.item(&id).unwrap().quantity, 2);
    }

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn load(&self) -> Option<CartSnapshot> {
            None
        }

        fn save(&self, _snapshot: &CartSnapshot) -> Result<(), SnapshotError> {
            Err(SnapshotError::Backend("disk full".to_string()))
        }
    }

    #[test]
    fn test_save_failure_is_reported_not_raised() {
        let failures = Rc::new(Cell::new(0));
        let counter = Rc::clone(&failures);
        let mut cart = CartContainer::with_notifier(FailingStore, move |notice: &Notice<'_>| {
            if matches!(notice, Notice::SaveFailed(_)) {
                counter.set(counter.get() + 1);
            }
        });

        let id = cart.add_item(product("Rug", 80));
        cart.remove_item(&id);

        assert_eq!(failures.get(), 2);
        assert!(cart.items().is_empty());
    }
}
