use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;

use super::observers::Detach;

/// RAII handle for a registered observer.
///
/// Dropping the handle unsubscribes. Call [`detach`](Subscription::detach) to
/// keep the observer registered for as long as its source lives.
#[must_use = "dropping a Subscription unsubscribes the observer immediately"]
pub struct Subscription {
    id: usize,
    list: Weak<dyn Detach>,
    done: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(id: usize, list: Weak<dyn Detach>) -> Self {
        Self {
            id,
            list,
            done: AtomicBool::new(false),
        }
    }

    /// Remove this exact observer. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if self.done.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(list) = self.list.upgrade() {
            list.detach(self.id);
        }
    }

    /// Whether the observer is still registered.
    pub fn is_active(&self) -> bool {
        !self.done.load(Ordering::Acquire) && self.list.strong_count() > 0
    }

    /// Give up the handle without unsubscribing.
    pub fn detach(self) {
        self.done.store(true, Ordering::Release);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
