//! Contracts for the hosted services the application talks to.
//!
//! The store itself does no I/O. These traits describe what the rest of the
//! application expects from the identity provider, the document database and
//! the recommendation endpoint, and the helpers here feed their results into
//! a store through ordinary dispatches.

mod memory;
mod recommendation;
mod sync;

pub use memory::MemoryDocumentStore;
pub use recommendation::{parse_recommendations, refresh_recommendations, RecommendationClient};
pub use sync::ProfileSync;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::{AppStore, UserAction, UserId};
use crate::error::BoundaryError;
use crate::store::Subscription;

/// Supplies the signed-in user's identifier.
pub trait IdentityProvider: Send + Sync {
    /// `None` until sign-in has completed.
    fn current_user(&self) -> Option<UserId>;
}

/// Callback invoked with the latest version of a watched document.
pub type DocumentCallback = Box<dyn Fn(&Value) + Send + Sync>;

/// Address of one per-user document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentKey {
    pub namespace: String,
    pub user_id: UserId,
}

impl DocumentKey {
    /// Address `user_id`'s document in `namespace`.
    pub fn new(namespace: impl Into<String>, user_id: UserId) -> Self {
        Self {
            namespace: namespace.into(),
            user_id,
        }
    }

    /// The document holding a user's profile.
    pub fn profile(user_id: UserId) -> Self {
        Self::new("profile", user_id)
    }
}

/// A per-user JSON document store with change notifications.
pub trait DocumentStore: Send + Sync {
    /// Upsert `document`, merging its top-level fields over any existing ones.
    fn merge(&self, key: &DocumentKey, document: Value) -> Result<(), BoundaryError>;

    /// The stored document, or `None` if nothing was ever merged at `key`.
    fn get(&self, key: &DocumentKey) -> Result<Option<Value>, BoundaryError>;

    /// Call `on_change` with the current document, if any, and again after
    /// every change until the returned subscription is dropped.
    fn watch(
        &self,
        key: &DocumentKey,
        on_change: DocumentCallback,
    ) -> Result<Subscription, BoundaryError>;
}

/// Record the provider's current user in the store.
///
/// Returns the identifier, or [`BoundaryError::NotSignedIn`] if the provider
/// has none yet, in which case nothing is dispatched.
pub fn sign_in<P>(store: &AppStore, provider: &P) -> Result<UserId, BoundaryError>
where
    P: IdentityProvider + ?Sized,
{
    let user_id = provider.current_user().ok_or(BoundaryError::NotSignedIn)?;
    store.dispatch(
        UserAction::Login {
            user_id: Some(user_id.clone()),
        }
        .into(),
    )?;
    tracing::info!(user = %user_id, "signed in");
    Ok(user_id)
}
