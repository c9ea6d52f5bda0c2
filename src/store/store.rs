use std::sync::{Arc, PoisonError, RwLock};

use super::observers::ObserverList;
use super::{State, StoreConfig, Subscription};
use crate::action::{Action, FromRawAction, RawAction};
use crate::error::StoreError;
use crate::runtime::{next_store_id, DispatchContext};
use crate::select::Selector;

/// A thread-safe store holding one immutable application snapshot.
///
/// Every state transition goes through [`dispatch`](Store::dispatch): the
/// targeted section's reducer runs, the new snapshot is committed, and then
/// every registered observer is called in registration order. Handles are
/// cheap to clone and all clones share the same state and observers.
///
/// # Examples
///
/// ```
/// use compass::app::{AppAction, AppState, ProfileAction, ProfileUpdate};
/// use compass::Store;
///
/// let store = Store::new(AppState::default());
/// store
///     .dispatch(AppAction::Profile(ProfileAction::SetProfile(ProfileUpdate {
///         skills: Some(vec!["Python".to_string()]),
///         ..ProfileUpdate::default()
///     })))
///     .unwrap();
/// assert_eq!(store.get().profile.profile.skills, vec!["Python".to_string()]);
/// ```
pub struct Store<S> {
    id: usize,
    config: Arc<StoreConfig>,
    state: Arc<RwLock<Arc<S>>>,
    observers: Arc<ObserverList<()>>,
}

impl<S: State> Store<S> {
    /// Create a new store with the given initial state.
    pub fn new(initial: S) -> Self {
        Self::with_config(initial, StoreConfig::default())
    }

    /// Create a new store with the given initial state and tunables.
    pub fn with_config(initial: S, config: StoreConfig) -> Self {
        Self {
            id: next_store_id(),
            config: Arc::new(config),
            state: Arc::new(RwLock::new(Arc::new(initial))),
            observers: Arc::new(ObserverList::new()),
        }
    }

    /// The tunables this store was created with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the current snapshot.
    ///
    /// Inside an observer this is the snapshot committed by the dispatch that
    /// triggered the notification (or a later one, if an earlier observer
    /// dispatched).
    pub fn get(&self) -> Arc<S> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Read the current snapshot without cloning the pointer.
    ///
    /// The state lock is held while `f` runs, so `f` must not dispatch into
    /// this store; that would deadlock. Use [`get`](Store::get) instead.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    /// Apply an action and notify observers.
    ///
    /// The snapshot only advances after the reducer returns `Ok`. A reducer
    /// error is returned unchanged and no observer runs. Observers may
    /// dispatch again; nested dispatches complete before the outer round
    /// continues, up to `max_dispatch_depth` levels.
    ///
    /// # Panics
    ///
    /// Resumes the first observer panic after the notification round has
    /// finished. The commit that triggered the round stands.
    pub fn dispatch(&self, action: S::Action) -> Result<(), StoreError> {
        let _frame =
            DispatchContext::enter(self.id, &self.config.name, self.config.max_dispatch_depth.get())?;
        let section = action.section();
        let operation = action.operation();

        {
            // Poisoning only happens if a reducer panicked, and the slot is
            // swapped after the reducer returns, so the held value is intact.
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let next = state.apply(action).inspect_err(|err| {
                tracing::debug!(store = %self.config.name, section, operation, error = %err, "reducer rejected action");
            })?;
            *state = Arc::new(next);
        }
        tracing::debug!(store = %self.config.name, section, operation, "dispatch committed");

        self.notify();
        Ok(())
    }

    /// Decode a string-namespaced action and dispatch it.
    ///
    /// Unknown sections or operations, malformed kinds and bad payloads are
    /// rejected before anything is reduced: the snapshot stays as it was and
    /// no observer runs.
    pub fn dispatch_raw(&self, raw: RawAction) -> Result<(), StoreError>
    where
        S::Action: FromRawAction,
    {
        let action = S::Action::from_raw(raw).inspect_err(|err| {
            tracing::warn!(store = %self.config.name, error = %err, "rejected raw action");
        })?;
        self.dispatch(action)
    }

    /// Subscribe to state changes.
    ///
    /// The observer is called with no arguments after every committed
    /// dispatch and reads the new state through [`get`](Store::get).
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observers.subscribe(Box::new(move |_: &()| observer()))
    }

    /// Derive a value that is recomputed after every notification.
    pub fn select<T, F>(&self, select: F) -> Selector<T>
    where
        T: Send + Sync + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Selector::new(self, select)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Shared cell holding the current snapshot, for observers that must not
    /// keep the whole store alive.
    pub(crate) fn snapshot_cell(&self) -> Arc<RwLock<Arc<S>>> {
        Arc::clone(&self.state)
    }

    /// Notify all observers of a state change.
    fn notify(&self) {
        let invoked = self.observers.notify(&());
        tracing::trace!(store = %self.config.name, observers = invoked, "notified observers");
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            config: Arc::clone(&self.config),
            state: Arc::clone(&self.state),
            observers: Arc::clone(&self.observers),
        }
    }
}
