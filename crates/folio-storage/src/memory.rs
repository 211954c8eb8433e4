// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: UUIDs generated via uuid v7 (time-ordered)
//
// Provides the same AnalyticsStore contract as PostgreSQL so the server can
// run without a database. All data is lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::{
    AnalyticsEvent, AnalyticsStore, EventColumn, EventQuery, NewAnalyticsEvent, Result, Visit,
};
use parking_lot::RwLock;
use uuid::Uuid;

/// In-memory database for dev mode
#[derive(Default)]
pub struct InMemoryDatabase {
    events: RwLock<Vec<AnalyticsEvent>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event with an explicit timestamp.
    /// Used for fixtures and backfills; the HTTP path always goes through
    /// `insert_event`, which stamps the current time.
    pub fn insert_event_at(
        &self,
        event: NewAnalyticsEvent,
        created_at: DateTime<Utc>,
    ) -> AnalyticsEvent {
        let row = event.into_event(Uuid::now_v7(), created_at);
        self.events.write().push(row.clone());
        row
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Snapshot of every stored row, in insertion order
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.read().clone()
    }
}

#[async_trait]
impl AnalyticsStore for InMemoryDatabase {
    async fn insert_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent> {
        Ok(self.insert_event_at(event, Utc::now()))
    }

    async fn count_events(&self, query: &EventQuery) -> Result<u64> {
        Ok(self
            .events
            .read()
            .iter()
            .filter(|e| query.matches(e))
            .count() as u64)
    }

    async fn project_column(
        &self,
        query: &EventQuery,
        column: EventColumn,
    ) -> Result<Vec<Option<String>>> {
        Ok(self
            .events
            .read()
            .iter()
            .filter(|e| query.matches(e))
            .map(|e| column.value_of(e))
            .collect())
    }

    async fn list_visits(&self, query: &EventQuery) -> Result<Vec<Visit>> {
        let mut visits: Vec<Visit> = self
            .events
            .read()
            .iter()
            .filter(|e| query.matches(e))
            .map(|e| Visit {
                visitor_id: e.visitor_id.clone(),
                created_at: e.created_at,
            })
            .collect();
        visits.sort_by_key(|v| v.created_at);
        Ok(visits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use folio_core::{Browser, DeviceType, Os, PAGEVIEW_EVENT};

    fn new_event(visitor_id: &str, event_type: &str, page_path: Option<&str>) -> NewAnalyticsEvent {
        NewAnalyticsEvent {
            visitor_id: visitor_id.to_string(),
            session_id: None,
            event_type: event_type.to_string(),
            page_path: page_path.map(str::to_string),
            referrer: None,
            user_agent: String::new(),
            device_type: DeviceType::Mobile,
            browser: Browser::Chrome,
            os: Os::Android,
            country: None,
            metadata: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn test_insert_stamps_server_time() {
        let db = InMemoryDatabase::new();
        let before = Utc::now();

        let event = db
            .insert_event(new_event("a", PAGEVIEW_EVENT, Some("/")))
            .await
            .unwrap();

        assert!(event.created_at >= before);
        assert_eq!(db.len(), 1);
        assert_eq!(db.events()[0].id, event.id);
    }

    #[tokio::test]
    async fn test_count_respects_window_and_type() {
        let db = InMemoryDatabase::new();
        let now = Utc::now();
        db.insert_event_at(new_event("a", PAGEVIEW_EVENT, None), now - Duration::days(40));
        db.insert_event_at(new_event("a", PAGEVIEW_EVENT, None), now - Duration::days(1));
        db.insert_event_at(new_event("b", "cta_click", None), now);

        let window = EventQuery::since(now - Duration::days(30));
        assert_eq!(db.count_events(&window).await.unwrap(), 2);
        assert_eq!(
            db.count_events(&window.clone().with_event_type(PAGEVIEW_EVENT))
                .await
                .unwrap(),
            1
        );
        assert_eq!(db.count_events(&EventQuery::all()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_project_column_keeps_nulls() {
        let db = InMemoryDatabase::new();
        db.insert_event(new_event("a", PAGEVIEW_EVENT, Some("/blog")))
            .await
            .unwrap();
        db.insert_event(new_event("b", PAGEVIEW_EVENT, None))
            .await
            .unwrap();

        let paths = db
            .project_column(&EventQuery::all(), EventColumn::PagePath)
            .await
            .unwrap();
        assert_eq!(paths, vec![Some("/blog".to_string()), None]);

        let devices = db
            .project_column(&EventQuery::all(), EventColumn::DeviceType)
            .await
            .unwrap();
        assert_eq!(devices, vec![Some("mobile".to_string()); 2]);
    }

    #[tokio::test]
    async fn test_list_visits_sorted_by_time() {
        let db = InMemoryDatabase::new();
        let now = Utc::now();
        db.insert_event_at(new_event("late", PAGEVIEW_EVENT, None), now);
        db.insert_event_at(new_event("early", PAGEVIEW_EVENT, None), now - Duration::hours(3));

        let visits = db.list_visits(&EventQuery::all()).await.unwrap();
        assert_eq!(visits[0].visitor_id, "early");
        assert_eq!(visits[1].visitor_id, "late");
    }
}
