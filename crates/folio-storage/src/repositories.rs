// Repository layer for PostgreSQL
//
// Every method is one statement against analytics_events. IDs are UUID v7
// generated here; created_at comes from the column default (NOW()).

use anyhow::{Context, Result};
use async_trait::async_trait;
use folio_core::{
    AnalyticsEvent, AnalyticsStore, EventColumn, EventQuery, NewAnalyticsEvent, Visit,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;
use crate::storage_error;

/// Shared WHERE clause: $1 since (inclusive), $2 until (exclusive), $3 event type.
const QUERY_FILTER: &str = r#"
    ($1::timestamptz IS NULL OR created_at >= $1)
    AND ($2::timestamptz IS NULL OR created_at < $2)
    AND ($3::text IS NULL OR event_type = $3)
"#;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    // ============================================
    // Analytics events (append-only)
    // ============================================

    pub async fn create_event(&self, input: NewAnalyticsEvent) -> Result<AnalyticsEventRow> {
        let row = sqlx::query_as::<_, AnalyticsEventRow>(
            r#"
            INSERT INTO analytics_events (
                id, visitor_id, session_id, event_type, page_path, referrer,
                user_agent, device_type, browser, os, country, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, visitor_id, session_id, event_type, page_path, referrer,
                      user_agent, device_type, browser, os, country, metadata, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&input.visitor_id)
        .bind(&input.session_id)
        .bind(&input.event_type)
        .bind(&input.page_path)
        .bind(&input.referrer)
        .bind(&input.user_agent)
        .bind(input.device_type.as_str())
        .bind(input.browser.as_str())
        .bind(input.os.as_str())
        .bind(&input.country)
        .bind(&input.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn count_events(&self, query: &EventQuery) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM analytics_events WHERE {}", QUERY_FILTER);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .bind(query.since)
            .bind(query.until)
            .bind(&query.event_type)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn select_column(
        &self,
        query: &EventQuery,
        column: EventColumn,
    ) -> Result<Vec<Option<String>>> {
        // column_name() is a fixed identifier, never caller input
        let sql = format!(
            "SELECT {} FROM analytics_events WHERE {}",
            column.column_name(),
            QUERY_FILTER
        );
        let values = sqlx::query_scalar::<_, Option<String>>(&sql)
            .bind(query.since)
            .bind(query.until)
            .bind(&query.event_type)
            .fetch_all(&self.pool)
            .await?;

        Ok(values)
    }

    pub async fn list_visits(&self, query: &EventQuery) -> Result<Vec<VisitRow>> {
        let sql = format!(
            "SELECT visitor_id, created_at FROM analytics_events WHERE {} ORDER BY created_at",
            QUERY_FILTER
        );
        let rows = sqlx::query_as::<_, VisitRow>(&sql)
            .bind(query.since)
            .bind(query.until)
            .bind(&query.event_type)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[async_trait]
impl AnalyticsStore for Database {
    async fn insert_event(&self, event: NewAnalyticsEvent) -> folio_core::Result<AnalyticsEvent> {
        let row = self.create_event(event).await.map_err(storage_error)?;
        Ok(row.into())
    }

    async fn count_events(&self, query: &EventQuery) -> folio_core::Result<u64> {
        let count = Database::count_events(self, query)
            .await
            .map_err(storage_error)?;
        Ok(count.max(0) as u64)
    }

    async fn project_column(
        &self,
        query: &EventQuery,
        column: EventColumn,
    ) -> folio_core::Result<Vec<Option<String>>> {
        self.select_column(query, column)
            .await
            .map_err(storage_error)
    }

    async fn list_visits(&self, query: &EventQuery) -> folio_core::Result<Vec<Visit>> {
        let rows = Database::list_visits(self, query)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(Visit::from).collect())
    }
}
