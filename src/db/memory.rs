use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use super::{DocumentStore, Filter, StoreError, StoreStatus, STATUS_COLLECTION_LIMIT};
use crate::models::Collection;

/// In-process store for handler tests.
#[derive(Default)]
pub struct MemoryStore {
    offline: bool,
    collections: Mutex<HashMap<Collection, Vec<(Uuid, Value)>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that behaves as if the database were unreachable.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn count(&self, collection: Collection) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

fn matches(document: &Value, filter: &Filter) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: Collection, document: Value) -> Result<String, StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable);
        }
        let id = Uuid::new_v4();
        self.collections
            .lock()
            .unwrap()
            .entry(collection)
            .or_default()
            .push((id, document));
        Ok(id.to_string())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        limit: Option<i64>,
    ) -> Result<Vec<Value>, StoreError> {
        if self.offline {
            return Err(StoreError::Unavailable);
        }
        let limit = limit.map_or(usize::MAX, |l| l.max(0) as usize);
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(_, doc)| doc)
                    .filter(|doc| matches(doc, &filter))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn status(&self) -> StoreStatus {
        if self.offline {
            return StoreStatus::disconnected();
        }
        let collections = self.collections.lock().unwrap();
        let mut names: Vec<String> = collections.keys().map(|c| c.name().to_string()).collect();
        names.sort();
        names.truncate(STATUS_COLLECTION_LIMIT);
        StoreStatus {
            connected: true,
            collections: Ok(names),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_find_applies_filter_and_limit_in_insertion_order() {
        let store = MemoryStore::new();
        for (title, active) in [("a", true), ("b", false), ("c", true), ("d", true)] {
            store
                .insert(Collection::Alert, json!({"title": title, "active": active}))
                .await
                .unwrap();
        }

        let mut filter = Filter::new();
        filter.insert("active".to_string(), json!(true));
        let docs = store.find(Collection::Alert, filter, Some(2)).await.unwrap();

        let titles: Vec<_> = docs.iter().map(|d| d["title"].clone()).collect();
        assert_eq!(titles, vec![json!("a"), json!("c")]);
        assert!(docs.iter().all(|d| d.get("_id").is_none()));
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Feedback, json!({"name": "Jane"}))
            .await
            .unwrap();

        assert_eq!(store.count(Collection::Feedback), 1);
        assert_eq!(store.count(Collection::Alert), 0);
        let docs = store
            .find(Collection::Alert, Filter::new(), None)
            .await
            .unwrap();
        assert!(docs.is_empty());
    }
}
