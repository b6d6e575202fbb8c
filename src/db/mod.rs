use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use crate::models::{Collection, Entity};

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod queries;

pub use postgres::PgDocumentStore;

/// Collection names reported by [`DocumentStore::status`] are capped at this.
pub const STATUS_COLLECTION_LIMIT: usize = 10;

/// Exact-match filter: every key must equal the document's value.
pub type Filter = Map<String, Value>;

pub type SharedStore = Arc<dyn DocumentStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not available")]
    Unavailable,

    #[error("Read failed: {0}")]
    Read(String),

    #[error("Write failed: {0}")]
    Write(String),
}

/// Connection snapshot used by the diagnostics endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreStatus {
    pub connected: bool,
    /// Known collection names, or the reason listing them failed.
    pub collections: Result<Vec<String>, String>,
}

impl StoreStatus {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            collections: Ok(Vec::new()),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Stores a new document and returns its store-assigned identifier.
    async fn insert(&self, collection: Collection, document: Value) -> Result<String, StoreError>;

    /// Returns up to `limit` matching documents in insertion order, without
    /// their identifiers. `None` means no limit.
    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        limit: Option<i64>,
    ) -> Result<Vec<Value>, StoreError>;

    async fn status(&self) -> StoreStatus;
}

pub async fn insert_entity<E: Entity>(store: &dyn DocumentStore, entity: &E) -> Result<String, StoreError> {
    let document = serde_json::to_value(entity).map_err(|e| StoreError::Write(e.to_string()))?;
    store.insert(E::COLLECTION, document).await
}

/// Finds documents and re-shapes each one through the entity schema.
pub async fn find_entities<E: Entity>(
    store: &dyn DocumentStore,
    filter: Filter,
    limit: Option<i64>,
) -> Result<Vec<E>, StoreError> {
    store
        .find(E::COLLECTION, filter, limit)
        .await?
        .iter()
        .map(|doc| {
            E::validate(doc).map_err(|e| {
                StoreError::Read(format!(
                    "stored {} document does not match schema: {e}",
                    E::COLLECTION.name()
                ))
            })
        })
        .collect()
}
