use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use super::{DocumentCallback, DocumentKey, DocumentStore};
use crate::error::BoundaryError;
use crate::store::observers::ObserverList;
use crate::store::Subscription;

/// In-process [`DocumentStore`], for tests and offline sessions.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentKey, Value>>,
    watchers: RwLock<HashMap<DocumentKey, Arc<ObserverList<Value>>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents with at least one watch list allocated.
    #[cfg(test)]
    fn watched_keys(&self) -> usize {
        self.watchers.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Watch list for `key`, created on demand. Lists whose watches have all
    /// been cancelled are dropped here.
    fn watchers_for(&self, key: &DocumentKey) -> Arc<ObserverList<Value>> {
        let mut watchers = self.watchers.write().unwrap_or_else(PoisonError::into_inner);
        watchers.retain(|_, list| list.len() > 0);
        Arc::clone(
            watchers
                .entry(key.clone())
                .or_insert_with(|| Arc::new(ObserverList::new())),
        )
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn merge(&self, key: &DocumentKey, document: Value) -> Result<(), BoundaryError> {
        let Value::Object(fields) = document else {
            return Err(BoundaryError::InvalidDocument(format!(
                "{}/{} must be a JSON object",
                key.namespace, key.user_id
            )));
        };

        let merged = {
            let mut documents = self.documents.write().unwrap_or_else(PoisonError::into_inner);
            let entry = documents
                .entry(key.clone())
                .or_insert_with(|| Value::Object(Default::default()));
            if let Value::Object(existing) = entry {
                existing.extend(fields);
            }
            entry.clone()
        };
        tracing::debug!(namespace = %key.namespace, user = %key.user_id, "document merged");

        let watchers = self
            .watchers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        if let Some(watchers) = watchers {
            if watchers.notify(&merged) == 0 {
                let mut all = self.watchers.write().unwrap_or_else(PoisonError::into_inner);
                if all.get(key).is_some_and(|list| list.len() == 0) {
                    all.remove(key);
                }
            }
        }
        Ok(())
    }

    fn get(&self, key: &DocumentKey) -> Result<Option<Value>, BoundaryError> {
        Ok(self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn watch(
        &self,
        key: &DocumentKey,
        on_change: DocumentCallback,
    ) -> Result<Subscription, BoundaryError> {
        if let Some(current) = self.get(key)? {
            on_change(&current);
        }
        Ok(self.watchers_for(key).subscribe(on_change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::UserId;
    use serde_json::json;
    use std::sync::Mutex;

    fn key() -> DocumentKey {
        DocumentKey::profile(UserId::new("u-1"))
    }

    #[test]
    fn merge_upserts_top_level_fields() {
        let docs = MemoryDocumentStore::new();
        docs.merge(&key(), json!({ "name": "Ada", "skills": ["Rust"] }))
            .unwrap();
        docs.merge(&key(), json!({ "skills": ["Go"] })).unwrap();

        assert_eq!(
            docs.get(&key()).unwrap(),
            Some(json!({ "name": "Ada", "skills": ["Go"] }))
        );
    }

    #[test]
    fn merge_rejects_non_objects() {
        let docs = MemoryDocumentStore::new();
        assert!(matches!(
            docs.merge(&key(), json!(["not", "an", "object"])),
            Err(BoundaryError::InvalidDocument(_))
        ));
    }

    #[test]
    fn watch_yields_current_then_changes_until_cancelled() {
        let docs = MemoryDocumentStore::new();
        docs.merge(&key(), json!({ "name": "Ada" })).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let watch = docs
            .watch(
                &key(),
                Box::new({
                    let seen = seen.clone();
                    move |doc: &Value| seen.lock().unwrap().push(doc["name"].clone())
                }),
            )
            .unwrap();

        docs.merge(&key(), json!({ "name": "Grace" })).unwrap();
        watch.unsubscribe();
        docs.merge(&key(), json!({ "name": "Linus" })).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![json!("Ada"), json!("Grace")]);
    }

    #[test]
    fn watchers_are_scoped_to_their_key() {
        let docs = MemoryDocumentStore::new();
        let hits = Arc::new(Mutex::new(0));
        let _watch = docs
            .watch(
                &key(),
                Box::new({
                    let hits = hits.clone();
                    move |_: &Value| *hits.lock().unwrap() += 1
                }),
            )
            .unwrap();

        docs.merge(&DocumentKey::profile(UserId::new("u-2")), json!({ "name": "Other" }))
            .unwrap();
        assert_eq!(*hits.lock().unwrap(), 0);
    }

    #[test]
    fn cancelled_watch_lists_are_pruned() {
        let docs = MemoryDocumentStore::new();
        let first = docs.watch(&key(), Box::new(|_: &Value| {})).unwrap();
        assert_eq!(docs.watched_keys(), 1);

        first.unsubscribe();
        docs.merge(&key(), json!({ "name": "Ada" })).unwrap();
        assert_eq!(docs.watched_keys(), 0);

        let other = DocumentKey::profile(UserId::new("u-2"));
        let second = docs.watch(&other, Box::new(|_: &Value| {})).unwrap();
        drop(second);
        let _third = docs.watch(&key(), Box::new(|_: &Value| {})).unwrap();
        assert_eq!(docs.watched_keys(), 1);
    }
}
