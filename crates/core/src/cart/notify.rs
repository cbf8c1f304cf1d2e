//! Side-effect hooks fired by the cart container.

use super::item::CartItem;
use super::snapshot::SnapshotError;

/// A transient user-facing notification.
#[derive(Debug)]
pub enum Notice<'a> {
    /// A line was added; shown as a toast.
    ItemAdded(&'a CartItem),
    /// Writing the snapshot failed. The in-memory cart is still updated.
    SaveFailed(&'a SnapshotError),
}

/// Receives container notifications.
///
/// Any `Fn(&Notice<'_>)` closure is a notifier.
pub trait CartNotifier {
    fn notify(&self, notice: &Notice<'_>);
}

impl<F> CartNotifier for F
where
    F: Fn(&Notice<'_>),
{
    fn notify(&self, notice: &Notice<'_>) {
        self(notice);
    }
}

/// Drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl CartNotifier for NoopNotifier {
    fn notify(&self, _notice: &Notice<'_>) {}
}
