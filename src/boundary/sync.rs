use std::sync::Arc;

use super::{DocumentKey, DocumentStore};
use crate::app::{AppStore, ProfileAction, ProfileUpdate};
use crate::error::BoundaryError;
use crate::store::Subscription;

/// Keeps the `profile` section in step with a user's profile document.
///
/// Every remote version of the document that would change the stored
/// profile is dispatched as `profile/setProfile`; versions that match it,
/// including the echo of our own [`save`](ProfileSync::save), are skipped.
/// Saving writes the store's profile back with an upsert-merge. Dropping the
/// sync cancels the watch.
pub struct ProfileSync<D: ?Sized> {
    documents: Arc<D>,
    key: DocumentKey,
    watch: Subscription,
}

impl<D: DocumentStore + ?Sized> ProfileSync<D> {
    /// Watch the document at `key` and apply its changes to `store`.
    ///
    /// A document that already exists is applied before this returns.
    pub fn bind(store: &AppStore, documents: Arc<D>, key: DocumentKey) -> Result<Self, BoundaryError> {
        let watch = documents.watch(
            &key,
            Box::new({
                let store = store.clone();
                move |document: &serde_json::Value| {
                    let update: ProfileUpdate = match serde_json::from_value(document.clone()) {
                        Ok(update) => update,
                        Err(err) => {
                            tracing::warn!(error = %err, "ignoring malformed profile document");
                            return;
                        }
                    };
                    let current = store.get();
                    if update.clone().merge_into(&current.profile.profile) == current.profile.profile {
                        tracing::trace!("profile document matches the store");
                        return;
                    }
                    if let Err(err) = store.dispatch(ProfileAction::SetProfile(update).into()) {
                        tracing::warn!(error = %err, "remote profile rejected");
                    }
                }
            }),
        )?;
        tracing::debug!(namespace = %key.namespace, user = %key.user_id, "profile sync bound");

        Ok(Self {
            documents,
            key,
            watch,
        })
    }

    /// Write the store's current profile to the document store.
    ///
    /// Refused with [`BoundaryError::NotSignedIn`] unless the store's signed-in
    /// user owns the synced document.
    pub fn save(&self, store: &AppStore) -> Result<(), BoundaryError> {
        let snapshot = store.get();
        if snapshot.user.user_id.as_ref() != Some(&self.key.user_id) {
            return Err(BoundaryError::NotSignedIn);
        }
        let document = serde_json::to_value(&snapshot.profile.profile)
            .map_err(|err| BoundaryError::InvalidDocument(err.to_string()))?;
        self.documents.merge(&self.key, document)
    }

    /// Address of the synced document.
    pub fn key(&self) -> &DocumentKey {
        &self.key
    }

    /// Stop applying remote changes. Saving still works.
    pub fn cancel(&self) {
        self.watch.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppState, UserAction, UserId};
    use crate::boundary::MemoryDocumentStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_observer(store: &AppStore) -> (Arc<AtomicUsize>, Subscription) {
        let calls = Arc::new(AtomicUsize::new(0));
        let sub = store.subscribe({
            let calls = calls.clone();
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
            }
        });
        (calls, sub)
    }

    fn signed_in_store(user: &str) -> AppStore {
        let store = AppStore::new(AppState::default());
        store
            .dispatch(
                UserAction::Login {
                    user_id: Some(UserId::new(user)),
                }
                .into(),
            )
            .unwrap();
        store
    }

    #[test]
    fn remote_changes_reach_the_store() {
        let store = signed_in_store("u-1");
        let docs = Arc::new(MemoryDocumentStore::new());
        let key = DocumentKey::profile(UserId::new("u-1"));
        docs.merge(&key, json!({ "name": "Ada", "skills": ["Rust"] }))
            .unwrap();

        let sync = ProfileSync::bind(&store, docs.clone(), key.clone()).unwrap();
        assert_eq!(store.get().profile.profile.name, "Ada");

        docs.merge(&key, json!({ "interests": ["Compilers"] })).unwrap();
        let profile = store.get().profile.profile.clone();
        assert_eq!(profile.skills, vec!["Rust"]);
        assert_eq!(profile.interests, vec!["Compilers"]);

        sync.cancel();
        docs.merge(&key, json!({ "name": "Grace" })).unwrap();
        assert_eq!(store.get().profile.profile.name, "Ada");
    }

    #[test]
    fn save_writes_back_for_the_owner_only() {
        let store = signed_in_store("u-1");
        let docs = Arc::new(MemoryDocumentStore::new());
        let sync = ProfileSync::bind(&store, docs.clone(), DocumentKey::profile(UserId::new("u-1")))
            .unwrap();

        store
            .dispatch(ProfileAction::ToggleSkill("SQL".to_string()).into())
            .unwrap();
        sync.save(&store).unwrap();
        assert_eq!(docs.get(sync.key()).unwrap().unwrap()["skills"], json!(["SQL"]));

        let stranger = signed_in_store("u-2");
        assert!(matches!(sync.save(&stranger), Err(BoundaryError::NotSignedIn)));
    }

    #[test]
    fn local_save_is_not_dispatched_back() {
        let store = signed_in_store("u-1");
        let docs = Arc::new(MemoryDocumentStore::new());
        let sync = ProfileSync::bind(&store, docs.clone(), DocumentKey::profile(UserId::new("u-1")))
            .unwrap();
        store
            .dispatch(ProfileAction::ToggleSkill("SQL".to_string()).into())
            .unwrap();
        let before = store.get();

        let (calls, _sub) = counting_observer(&store);
        sync.save(&store).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(Arc::ptr_eq(&before, &store.get()));
    }

    #[test]
    fn autosave_runs_once_per_change() {
        let store = signed_in_store("u-1");
        let docs = Arc::new(MemoryDocumentStore::new());
        let sync = Arc::new(
            ProfileSync::bind(&store, docs.clone(), DocumentKey::profile(UserId::new("u-1")))
                .unwrap(),
        );
        let saves = Arc::new(AtomicUsize::new(0));
        let _autosave = store.subscribe({
            let store = store.clone();
            let sync = sync.clone();
            let saves = saves.clone();
            move || {
                saves.fetch_add(1, Ordering::SeqCst);
                sync.save(&store).unwrap();
            }
        });

        store
            .dispatch(ProfileAction::ToggleSkill("Rust".to_string()).into())
            .unwrap();

        assert_eq!(saves.load(Ordering::SeqCst), 1);
        assert_eq!(docs.get(sync.key()).unwrap().unwrap()["skills"], json!(["Rust"]));
    }

    #[test]
    fn remote_change_still_applies_after_a_save() {
        let store = signed_in_store("u-1");
        let docs = Arc::new(MemoryDocumentStore::new());
        let key = DocumentKey::profile(UserId::new("u-1"));
        let sync = ProfileSync::bind(&store, docs.clone(), key.clone()).unwrap();
        sync.save(&store).unwrap();

        let (calls, _sub) = counting_observer(&store);
        docs.merge(&key, json!({ "name": "Grace" })).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get().profile.profile.name, "Grace");
    }
}
