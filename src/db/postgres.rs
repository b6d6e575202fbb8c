use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Row};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{queries, DocumentStore, Filter, StoreError, StoreStatus, STATUS_COLLECTION_LIMIT};
use crate::config::AppConfig;
use crate::models::Collection;

pub type DbPool = Pool<Postgres>;

pub async fn init_pool(config: &AppConfig, database_url: &str) -> Result<DbPool> {
    let mut options = PgConnectOptions::from_str(database_url)?;
    if let Some(name) = &config.database_name {
        options = options.database(name);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout))
        .connect_with(options)
        .await?;
    Ok(pool)
}

async fn ensure_collections(pool: &DbPool) -> Result<()> {
    for collection in Collection::ALL {
        for statement in create_statements(collection) {
            sqlx::query(statement).execute(pool).await?;
        }
    }
    Ok(())
}

fn create_statements(collection: Collection) -> &'static [&'static str] {
    match collection {
        Collection::Alert => &[
            queries::CREATE_ALERT_COLLECTION,
            queries::CREATE_ALERT_DOC_INDEX,
        ],
        Collection::Feedback => &[queries::CREATE_FEEDBACK_COLLECTION],
    }
}

fn insert_statement(collection: Collection) -> &'static str {
    match collection {
        Collection::Alert => queries::INSERT_ALERT,
        Collection::Feedback => queries::INSERT_FEEDBACK,
    }
}

fn select_statement(collection: Collection) -> &'static str {
    match collection {
        Collection::Alert => queries::SELECT_ALERTS,
        Collection::Feedback => queries::SELECT_FEEDBACK,
    }
}

/// Document store backed by one JSONB table per collection.
pub struct PgDocumentStore {
    pool: Option<DbPool>,
}

impl PgDocumentStore {
    /// Opens the connection pool once for the process lifetime. A missing URL
    /// or an unreachable database leaves the store disconnected rather than
    /// failing startup.
    pub async fn connect(config: &AppConfig) -> Self {
        let Some(database_url) = config.database_url.as_deref() else {
            warn!("DATABASE_URL not set, running without a database");
            return Self::disconnected();
        };

        let pool = match init_pool(config, database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                warn!("Failed to connect to database: {}", e);
                return Self::disconnected();
            }
        };

        if let Err(e) = ensure_collections(&pool).await {
            warn!("Failed to prepare collections: {}", e);
        }

        info!("Connected to database");
        Self { pool: Some(pool) }
    }

    pub fn disconnected() -> Self {
        Self { pool: None }
    }

    fn pool(&self) -> Result<&DbPool, StoreError> {
        self.pool.as_ref().ok_or(StoreError::Unavailable)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert(&self, collection: Collection, document: Value) -> Result<String, StoreError> {
        let pool = self.pool()?;
        let id = Uuid::new_v4();

        sqlx::query(insert_statement(collection))
            .bind(id)
            .bind(Json(&document))
            .execute(pool)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        info!("Inserted document {} into {}", id, collection.name());
        Ok(id.to_string())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: Filter,
        limit: Option<i64>,
    ) -> Result<Vec<Value>, StoreError> {
        let pool = self.pool()?;

        let rows = sqlx::query(select_statement(collection))
            .bind(Json(&filter))
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;

        let documents = rows
            .iter()
            .map(|row| row.try_get::<Json<Value>, _>("doc").map(|doc| doc.0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Read(e.to_string()))?;

        debug!(
            "Found {} documents in {} (filter: {:?}, limit: {:?})",
            documents.len(),
            collection.name(),
            filter,
            limit
        );
        Ok(documents)
    }

    async fn status(&self) -> StoreStatus {
        let Ok(pool) = self.pool() else {
            return StoreStatus::disconnected();
        };

        let collections = sqlx::query(queries::SELECT_COLLECTION_NAMES)
            .bind(STATUS_COLLECTION_LIMIT as i64)
            .fetch_all(pool)
            .await
            .and_then(|rows| {
                rows.iter()
                    .map(|row| row.try_get::<String, _>("name"))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(|e| e.to_string());

        StoreStatus {
            connected: true,
            collections,
        }
    }
}
