use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::store::{State, Store, Subscription};

/// A value derived from a store's snapshot.
///
/// The projection runs once on creation and again after every notification,
/// whether or not the projected value changed. There is no memoization:
/// a dispatch to any section re-evaluates every live selector.
pub struct Selector<T> {
    cached_value: Arc<RwLock<T>>,
    evaluations: Arc<AtomicUsize>,
    subscription: Subscription,
}

impl<T: Send + Sync + 'static> Selector<T> {
    pub(crate) fn new<S, F>(store: &Store<S>, select: F) -> Self
    where
        S: State,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let cached_value = Arc::new(RwLock::new(store.read(&select)));
        let evaluations = Arc::new(AtomicUsize::new(1));

        // Capture the snapshot cell, not the store, so the observer list
        // never owns a handle back to itself.
        let snapshot = store.snapshot_cell();
        let subscription = store.subscribe({
            let cached_value = Arc::clone(&cached_value);
            let evaluations = Arc::clone(&evaluations);
            move || {
                let current = Arc::clone(&snapshot.read().unwrap_or_else(PoisonError::into_inner));
                let value = select(&current);
                *cached_value.write().unwrap_or_else(PoisonError::into_inner) = value;
                evaluations.fetch_add(1, Ordering::SeqCst);
            }
        });

        Self {
            cached_value,
            evaluations,
            subscription,
        }
    }

    /// Read the derived value with a function without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.cached_value.read().unwrap_or_else(PoisonError::into_inner);
        f(&value)
    }

    /// How many times the projection has run, including the initial run.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }

    /// Stop following the store. The last derived value stays readable.
    pub fn unsubscribe(&self) {
        self.subscription.unsubscribe();
    }

    /// Whether the selector still follows the store.
    pub fn is_active(&self) -> bool {
        self.subscription.is_active()
    }
}

impl<T: Clone + Send + Sync + 'static> Selector<T> {
    /// Get the current derived value.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}
