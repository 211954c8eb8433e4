// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use folio_core::{AnalyticsEvent, Browser, DeviceType, Os, Visit};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AnalyticsEventRow {
    pub id: Uuid,
    pub visitor_id: String,
    pub session_id: Option<String>,
    pub event_type: String,
    pub page_path: Option<String>,
    pub referrer: Option<String>,
    pub user_agent: String,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub country: Option<String>,
    pub metadata: sqlx::types::JsonValue,
    pub created_at: DateTime<Utc>,
}

impl From<AnalyticsEventRow> for AnalyticsEvent {
    fn from(row: AnalyticsEventRow) -> Self {
        AnalyticsEvent {
            id: row.id,
            visitor_id: row.visitor_id,
            session_id: row.session_id,
            event_type: row.event_type,
            page_path: row.page_path,
            referrer: row.referrer,
            user_agent: row.user_agent,
            device_type: DeviceType::from(row.device_type.as_str()),
            browser: Browser::from(row.browser.as_str()),
            os: Os::from(row.os.as_str()),
            country: row.country,
            metadata: row.metadata,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct VisitRow {
    pub visitor_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<VisitRow> for Visit {
    fn from(row: VisitRow) -> Self {
        Visit {
            visitor_id: row.visitor_id,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_labels_map_to_domain() {
        let row = AnalyticsEventRow {
            id: Uuid::now_v7(),
            visitor_id: "v-1".to_string(),
            session_id: Some("s-1".to_string()),
            event_type: "pageview".to_string(),
            page_path: Some("/blog".to_string()),
            referrer: None,
            user_agent: "Mozilla/5.0".to_string(),
            device_type: "tablet".to_string(),
            browser: "Firefox".to_string(),
            os: "iOS".to_string(),
            country: Some("EG".to_string()),
            metadata: serde_json::json!({"lang": "ar"}),
            created_at: Utc::now(),
        };

        let event = AnalyticsEvent::from(row);
        assert_eq!(event.device_type, DeviceType::Tablet);
        assert_eq!(event.browser, Browser::Firefox);
        assert_eq!(event.os, Os::Ios);
        assert_eq!(event.metadata["lang"], "ar");
    }
}
