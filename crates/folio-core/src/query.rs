// Query filters shared by every store implementation
//
// Reads are expressed as a time window on `created_at` (inclusive lower bound,
// exclusive upper bound) plus an optional equality filter on `event_type`.

use chrono::{DateTime, Utc};

use crate::event::AnalyticsEvent;

/// Filter for count and projection reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Only rows with `created_at >= since`
    pub since: Option<DateTime<Utc>>,
    /// Only rows with `created_at < until`
    pub until: Option<DateTime<Utc>>,
    /// Only rows with `event_type == event_type`
    pub event_type: Option<String>,
}

impl EventQuery {
    /// Every row in the table
    pub fn all() -> Self {
        Self::default()
    }

    /// Rows created at or after `since`
    pub fn since(since: DateTime<Utc>) -> Self {
        Self {
            since: Some(since),
            ..Default::default()
        }
    }

    pub fn until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Evaluate the filter against a stored event (used by in-process stores)
    pub fn matches(&self, event: &AnalyticsEvent) -> bool {
        if let Some(since) = self.since {
            if event.created_at < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if event.created_at >= until {
                return false;
            }
        }
        if let Some(event_type) = &self.event_type {
            if &event.event_type != event_type {
                return false;
            }
        }
        true
    }
}

/// Single column that can be projected across matching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColumn {
    VisitorId,
    PagePath,
    DeviceType,
    Browser,
}

impl EventColumn {
    /// SQL column name. Fixed strings only, never user input.
    pub fn column_name(&self) -> &'static str {
        match self {
            EventColumn::VisitorId => "visitor_id",
            EventColumn::PagePath => "page_path",
            EventColumn::DeviceType => "device_type",
            EventColumn::Browser => "browser",
        }
    }

    /// Read the column from a stored event
    pub fn value_of(&self, event: &AnalyticsEvent) -> Option<String> {
        match self {
            EventColumn::VisitorId => Some(event.visitor_id.clone()),
            EventColumn::PagePath => event.page_path.clone(),
            EventColumn::DeviceType => Some(event.device_type.as_str().to_string()),
            EventColumn::Browser => Some(event.browser.as_str().to_string()),
        }
    }
}

/// Visitor/time pair used for per-day rollups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub visitor_id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Browser, DeviceType, NewAnalyticsEvent, Os};
    use chrono::Duration;
    use uuid::Uuid;

    fn event_at(event_type: &str, created_at: DateTime<Utc>) -> AnalyticsEvent {
        NewAnalyticsEvent {
            visitor_id: "v".to_string(),
            session_id: None,
            event_type: event_type.to_string(),
            page_path: None,
            referrer: None,
            user_agent: String::new(),
            device_type: DeviceType::Desktop,
            browser: Browser::Unknown,
            os: Os::Unknown,
            country: None,
            metadata: serde_json::json!({}),
        }
        .into_event(Uuid::now_v7(), created_at)
    }

    #[test]
    fn test_since_is_inclusive() {
        let now = Utc::now();
        let query = EventQuery::since(now);
        assert!(query.matches(&event_at("pageview", now)));
        assert!(!query.matches(&event_at("pageview", now - Duration::seconds(1))));
    }

    #[test]
    fn test_until_is_exclusive() {
        let now = Utc::now();
        let query = EventQuery::all().until(now);
        assert!(!query.matches(&event_at("pageview", now)));
        assert!(query.matches(&event_at("pageview", now - Duration::seconds(1))));
    }

    #[test]
    fn test_event_type_equality() {
        let now = Utc::now();
        let query = EventQuery::since(now - Duration::days(1)).with_event_type("pageview");
        assert!(query.matches(&event_at("pageview", now)));
        assert!(!query.matches(&event_at("cta_click", now)));
    }

    #[test]
    fn test_column_projection() {
        let event = event_at("pageview", Utc::now());
        assert_eq!(EventColumn::VisitorId.value_of(&event), Some("v".to_string()));
        assert_eq!(EventColumn::PagePath.value_of(&event), None);
        assert_eq!(
            EventColumn::DeviceType.value_of(&event),
            Some("desktop".to_string())
        );
        assert_eq!(EventColumn::Browser.column_name(), "browser");
    }
}
