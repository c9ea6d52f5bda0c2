use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::StoreError;

static NEXT_STORE_ID: AtomicUsize = AtomicUsize::new(0);

// Thread-local stack of stores with a dispatch in progress, innermost last.
thread_local! {
    static DISPATCH_STACK: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Generate a unique ID for a newly constructed store.
pub(crate) fn next_store_id() -> usize {
    NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Bookkeeping for in-progress dispatches on the current thread.
///
/// Every call to [`Store::dispatch`](crate::Store::dispatch) enters the
/// context for its store before reducing and leaves it after the last
/// observer returns. An observer that dispatches into the same store therefore
/// sees a deeper frame, which is how runaway re-entrant dispatch is caught.
pub struct DispatchContext;

impl DispatchContext {
    /// Push a frame for `store_id`, failing if the store already has
    /// `limit` frames open on this thread.
    pub(crate) fn enter(
        store_id: usize,
        store_name: &str,
        limit: usize,
    ) -> Result<DispatchFrame, StoreError> {
        DISPATCH_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            let open = stack.iter().filter(|id| **id == store_id).count();
            if open >= limit {
                tracing::warn!(store = store_name, depth = open, limit, "re-entrant dispatch rejected");
                return Err(StoreError::DispatchDepthExceeded {
                    store: store_name.to_string(),
                    limit,
                });
            }
            stack.push(store_id);
            Ok(DispatchFrame { store_id })
        })
    }

    /// Number of dispatches currently open for `store_id` on this thread.
    pub fn depth(store_id: usize) -> usize {
        DISPATCH_STACK.with(|stack| stack.borrow().iter().filter(|id| **id == store_id).count())
    }

    /// Whether any store is dispatching on this thread.
    pub fn is_dispatching() -> bool {
        DISPATCH_STACK.with(|stack| !stack.borrow().is_empty())
    }
}

/// RAII guard for one open dispatch. Popped on drop, including during unwinding.
pub(crate) struct DispatchFrame {
    store_id: usize,
}

impl Drop for DispatchFrame {
    fn drop(&mut self) {
        DISPATCH_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|id| *id == self.store_id) {
                stack.remove(pos);
            }
        });
    }
}
