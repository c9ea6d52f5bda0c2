use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::Subscription;

type Callback<A> = Box<dyn Fn(&A) + Send + Sync>;

struct Slot<A> {
    id: usize,
    active: AtomicBool,
    callback: Callback<A>,
}

/// Registration-ordered list of callbacks, notified copy-on-write.
///
/// A notification round iterates over a snapshot of the list taken when the
/// round starts, so callbacks may subscribe or unsubscribe (themselves or
/// others) mid-round. Removed slots are flagged inactive and skipped if the
/// round has not reached them yet; slots added mid-round first fire in the
/// next round.
pub(crate) struct ObserverList<A> {
    next_id: AtomicUsize,
    slots: RwLock<Vec<Arc<Slot<A>>>>,
}

impl<A: 'static> ObserverList<A> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(0),
            slots: RwLock::new(Vec::new()),
        }
    }

    /// Register a callback and return the handle that removes it.
    pub(crate) fn subscribe(self: &Arc<Self>, callback: Callback<A>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(Slot {
                id,
                active: AtomicBool::new(true),
                callback,
            }));
        let list: Arc<dyn Detach> = self.clone();
        Subscription::new(id, Arc::downgrade(&list))
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Invoke every live callback in registration order.
    ///
    /// A panicking callback does not stop the round: it is logged, the
    /// remaining callbacks run, and the first panic is resumed afterwards.
    /// Returns the number of callbacks invoked.
    pub(crate) fn notify(&self, value: &A) -> usize {
        let round: Vec<Arc<Slot<A>>> = self
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut invoked = 0;
        let mut first_panic: Option<Box<dyn Any + Send>> = None;
        for slot in round {
            if !slot.active.load(Ordering::Acquire) {
                continue;
            }
            invoked += 1;
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| (slot.callback)(value))) {
                tracing::error!(observer = slot.id, "observer panicked during notification");
                first_panic.get_or_insert(payload);
            }
        }

        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
        invoked
    }
}

/// Removal side of an observer list, erased over the callback argument type.
pub(crate) trait Detach: Send + Sync {
    /// Remove the slot with `id`. Returns `false` if it was already gone.
    fn detach(&self, id: usize) -> bool;
}

impl<A: 'static> Detach for ObserverList<A> {
    fn detach(&self, id: usize) -> bool {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        match slots.iter().position(|slot| slot.id == id) {
            Some(pos) => {
                let slot = slots.remove(pos);
                slot.active.store(false, Ordering::Release);
                true
            }
            None => false,
        }
    }
}
