// Storage backend abstraction
// Decision: Use enum dispatch for the concrete backends, chosen once at startup
//
// StorageBackend wraps either PostgreSQL (production) or in-memory (dev mode)
// storage and implements AnalyticsStore by delegating to the active variant.

use anyhow::Result;
use async_trait::async_trait;
use folio_core::{AnalyticsEvent, AnalyticsStore, EventColumn, EventQuery, NewAnalyticsEvent, Visit};
use std::sync::Arc;

use super::memory::InMemoryDatabase;
use super::repositories::Database;

/// Storage backend that can be either PostgreSQL or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// PostgreSQL database (production)
    Postgres(Database),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Create a PostgreSQL storage backend from a database URL
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        Ok(Self::Postgres(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Short name for health output and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::InMemory(_) => "memory",
        }
    }

    /// Run migrations (no-op for in-memory)
    pub async fn migrate(&self) -> Result<()> {
        match self {
            Self::Postgres(db) => db.migrate().await,
            Self::InMemory(_) => Ok(()),
        }
    }
}

#[async_trait]
impl AnalyticsStore for StorageBackend {
    async fn insert_event(&self, event: NewAnalyticsEvent) -> folio_core::Result<AnalyticsEvent> {
        match self {
            Self::Postgres(db) => db.insert_event(event).await,
            Self::InMemory(db) => db.insert_event(event).await,
        }
    }

    async fn count_events(&self, query: &EventQuery) -> folio_core::Result<u64> {
        match self {
            Self::Postgres(db) => AnalyticsStore::count_events(db, query).await,
            Self::InMemory(db) => db.count_events(query).await,
        }
    }

    async fn project_column(
        &self,
        query: &EventQuery,
        column: EventColumn,
    ) -> folio_core::Result<Vec<Option<String>>> {
        match self {
            Self::Postgres(db) => db.project_column(query, column).await,
            Self::InMemory(db) => db.project_column(query, column).await,
        }
    }

    async fn list_visits(&self, query: &EventQuery) -> folio_core::Result<Vec<Visit>> {
        match self {
            Self::Postgres(db) => AnalyticsStore::list_visits(db, query).await,
            Self::InMemory(db) => db.list_visits(query).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_backend_kind() {
        let backend = StorageBackend::in_memory();
        assert_eq!(backend.kind(), "memory");
    }

    #[tokio::test]
    async fn test_in_memory_migrate_is_noop() {
        let backend = StorageBackend::in_memory();
        backend.migrate().await.unwrap();
        assert_eq!(
            backend.count_events(&EventQuery::all()).await.unwrap(),
            0
        );
    }
}
