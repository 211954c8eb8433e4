// Core traits for pluggable backends
//
// The recorder and aggregator only see this trait, so they run unchanged on:
// - PostgreSQL (production)
// - In-memory storage (dev mode and tests)
// - Test doubles that inject failures

use async_trait::async_trait;

use crate::error::Result;
use crate::event::{AnalyticsEvent, NewAnalyticsEvent};
use crate::query::{EventColumn, EventQuery, Visit};

/// Append-only datastore for analytics events.
///
/// Implementations never update or delete rows. Every method is a single,
/// independent datastore call and is safe to run concurrently.
#[async_trait]
pub trait AnalyticsStore: Send + Sync {
    /// Append one event. The store assigns `id` and `created_at`.
    async fn insert_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent>;

    /// Count rows matching the query
    async fn count_events(&self, query: &EventQuery) -> Result<u64>;

    /// Project a single column across matching rows (one entry per row)
    async fn project_column(
        &self,
        query: &EventQuery,
        column: EventColumn,
    ) -> Result<Vec<Option<String>>>;

    /// Visitor/time pairs for matching rows
    async fn list_visits(&self, query: &EventQuery) -> Result<Vec<Visit>>;
}
