// Event recorder
//
// Validates a client submission, derives device/browser/OS labels from the
// request's user agent, and appends exactly one row. The client never
// supplies classification labels or timestamps.

use folio_core::{
    classify_user_agent, AnalyticsError, AnalyticsEvent, AnalyticsStore, NewAnalyticsEvent,
    Result, PAGEVIEW_EVENT,
};
use std::sync::Arc;

use crate::api::analytics::RecordEventRequest;

/// Request metadata observed by the server, never taken from the body.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// User-agent header, empty when absent
    pub user_agent: String,
    /// CDN-provided country code, if any
    pub country: Option<String>,
}

pub struct EventRecorder {
    store: Arc<dyn AnalyticsStore>,
}

impl EventRecorder {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self { store }
    }

    /// Record one event. Fails with `MissingVisitorId` before touching the
    /// store when the submission has no usable visitor ID.
    pub async fn record(
        &self,
        req: RecordEventRequest,
        ctx: RequestContext,
    ) -> Result<AnalyticsEvent> {
        let input = Self::build_event(req, ctx)?;
        let event = self.store.insert_event(input).await?;

        tracing::debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            device = %event.device_type,
            browser = %event.browser,
            "Recorded analytics event"
        );

        Ok(event)
    }

    fn build_event(req: RecordEventRequest, ctx: RequestContext) -> Result<NewAnalyticsEvent> {
        let visitor_id = non_empty(req.visitor_id).ok_or(AnalyticsError::MissingVisitorId)?;
        let labels = classify_user_agent(&ctx.user_agent);

        let metadata = match req.metadata {
            Some(serde_json::Value::Null) | None => serde_json::json!({}),
            Some(value) => value,
        };

        Ok(NewAnalyticsEvent {
            visitor_id,
            session_id: req.session_id,
            event_type: non_empty(req.event_type).unwrap_or_else(|| PAGEVIEW_EVENT.to_string()),
            page_path: req.page_path,
            referrer: non_empty(req.referrer),
            user_agent: ctx.user_agent,
            device_type: labels.device_type,
            browser: labels.browser,
            os: labels.os,
            country: ctx.country,
            metadata,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
