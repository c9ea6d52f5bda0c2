use std::sync::Arc;

use crate::action::Action;
use crate::error::ReduceError;

/// One independently owned partition of the application state.
///
/// A section declares its name, its initial value (through [`Default`]) and a
/// pure reducer over its own closed action type. The reducer only ever sees
/// its own section, so sections cannot read or write each other's data.
pub trait Section: Default + Send + Sync + 'static {
    /// Namespace used in action kinds, e.g. `"profile"`.
    const NAME: &'static str;

    type Action;

    /// Compute the next section state. Must not have side effects.
    fn reduce(&self, action: Self::Action) -> Result<Self, ReduceError>;
}

/// A composed application state that a [`Store`](crate::Store) can hold.
///
/// Implementations route each root action to exactly one section and build a
/// new snapshot that shares every other section unchanged.
pub trait State: Send + Sync + 'static {
    type Action: Action;

    fn apply(&self, action: Self::Action) -> Result<Self, ReduceError>
    where
        Self: Sized;
}

/// Run a section's reducer against a shared slot and wrap the result.
///
/// Root [`State::apply`] implementations use this to replace the one section
/// an action targets while cloning the `Arc`s of the others.
pub fn reduce_section<T: Section>(
    current: &Arc<T>,
    action: T::Action,
) -> Result<Arc<T>, ReduceError> {
    current.reduce(action).map(Arc::new)
}
