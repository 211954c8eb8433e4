// Analytics API endpoints
//
// POST records one event; GET variants read aggregated figures. Failures never
// leak store details to the caller.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use folio_core::{AnalyticsError, AnalyticsStore, AnalyticsSummary, DailySeries, OverviewStats};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::common::ErrorResponse;
use crate::services::aggregator::{DEFAULT_DAILY_WINDOW_DAYS, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::services::{Aggregator, EventRecorder, RequestContext};

/// Header set by the CDN with the client's ISO country code
pub const COUNTRY_HEADER: &str = "cf-ipcountry";

const RECORD_FAILED: &str = "Failed to record analytics";
const FETCH_FAILED: &str = "Failed to fetch analytics";
const INVALID_BODY: &str = "Invalid request body";
const INVALID_DAYS: &str = "Invalid days parameter";

type ApiError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub recorder: Arc<EventRecorder>,
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(store: Arc<dyn AnalyticsStore>) -> Self {
        Self {
            recorder: Arc::new(EventRecorder::new(store.clone())),
            aggregator: Arc::new(Aggregator::new(store)),
        }
    }
}

/// Tracking submission from the browser.
/// Classification labels and timestamps are derived server-side. String fields
/// carrying any other JSON type are treated as absent.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordEventRequest {
    /// Opaque, client-generated visitor identifier.
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "c0a8012e-6f1d-4b8e-9a57-3d2f5e1b7a90")]
    pub visitor_id: Option<String>,
    /// Client-generated session identifier.
    #[serde(default, deserialize_with = "lenient_string")]
    pub session_id: Option<String>,
    /// Event kind. Defaults to "pageview".
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "pageview")]
    pub event_type: Option<String>,
    /// Path of the page the event occurred on.
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "/projects")]
    pub page_path: Option<String>,
    /// Referring URL.
    #[serde(default, deserialize_with = "lenient_string")]
    pub referrer: Option<String>,
    /// Free-form payload stored as-is.
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecordEventResponse {
    pub success: bool,
}

/// Lookback window in whole days
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WindowQuery {
    /// Number of trailing days to include (capped at 3650)
    #[param(value_type = Option<u64>)]
    pub days: Option<String>,
}

/// Record an analytics event
#[utoipa::path(
    post,
    path = "/analytics",
    request_body = RecordEventRequest,
    responses(
        (status = 200, description = "Event recorded", body = RecordEventResponse),
        (status = 400, description = "Missing visitor ID or malformed body", body = ErrorResponse),
        (status = 500, description = "Datastore failure", body = ErrorResponse)
    ),
    tag = "analytics"
)]
pub async fn record_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RecordEventResponse>, ApiError> {
    let req: RecordEventRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Rejected analytics body: {}", e);
        ErrorResponse::new(INVALID_BODY).into_response(StatusCode::BAD_REQUEST)
    })?;

    state
        .recorder
        .record(req, request_context(&headers))
        .await
        .map_err(|e| match e {
            AnalyticsError::MissingVisitorId => {
                tracing::warn!("Rejected analytics event: {}", e);
                ErrorResponse::new(e.to_string()).into_response(StatusCode::BAD_REQUEST)
            }
            e => {
                tracing::error!("Failed to record analytics: {}", e);
                ErrorResponse::new(RECORD_FAILED).into_response(StatusCode::INTERNAL_SERVER_ERROR)
            }
        })?;

    Ok(Json(RecordEventResponse { success: true }))
}

/// Summary over a trailing window
#[utoipa::path(
    get,
    path = "/analytics",
    params(WindowQuery),
    responses(
        (status = 200, description = "Analytics summary", body = AnalyticsSummary),
        (status = 400, description = "Invalid days parameter", body = ErrorResponse),
        (status = 500, description = "Datastore failure", body = ErrorResponse)
    ),
    tag = "analytics"
)]
pub async fn get_summary(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<AnalyticsSummary>, ApiError> {
    let days = window_days(query, DEFAULT_WINDOW_DAYS)?;
    let summary = state.aggregator.summarize(days).await.map_err(fetch_failed)?;
    Ok(Json(summary))
}

/// Per-day pageviews and visitors over a trailing window
#[utoipa::path(
    get,
    path = "/analytics/daily",
    params(WindowQuery),
    responses(
        (status = 200, description = "Daily series", body = DailySeries),
        (status = 400, description = "Invalid days parameter", body = ErrorResponse),
        (status = 500, description = "Datastore failure", body = ErrorResponse)
    ),
    tag = "analytics"
)]
pub async fn get_daily(
    State(state): State<AppState>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<DailySeries>, ApiError> {
    let days = window_days(query, DEFAULT_DAILY_WINDOW_DAYS)?;
    let series = state.aggregator.daily(days).await.map_err(fetch_failed)?;
    Ok(Json(series))
}

/// Headline visitor figures for the dashboard
#[utoipa::path(
    get,
    path = "/analytics/overview",
    responses(
        (status = 200, description = "Overview figures", body = OverviewStats),
        (status = 500, description = "Datastore failure", body = ErrorResponse)
    ),
    tag = "analytics"
)]
pub async fn get_overview(
    State(state): State<AppState>,
) -> Result<Json<OverviewStats>, ApiError> {
    let overview = state.aggregator.overview().await.map_err(fetch_failed)?;
    Ok(Json(overview))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/analytics", get(get_summary).post(record_event))
        .route("/analytics/daily", get(get_daily))
        .route("/analytics/overview", get(get_overview))
        .with_state(state)
}

fn request_context(headers: &HeaderMap) -> RequestContext {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    RequestContext {
        user_agent: header(axum::http::header::USER_AGENT.as_str()).unwrap_or_default(),
        country: header(COUNTRY_HEADER),
    }
}

fn window_days(
    query: Result<Query<WindowQuery>, QueryRejection>,
    default: u32,
) -> Result<u32, ApiError> {
    let raw = match query {
        Ok(Query(q)) => q.days,
        Err(e) => {
            tracing::warn!("Rejected window query: {}", e);
            return Err(ErrorResponse::new(INVALID_DAYS).into_response(StatusCode::BAD_REQUEST));
        }
    };

    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => parse_days(value).ok_or_else(|| {
            tracing::warn!(days = %value, "Rejected window query");
            ErrorResponse::new(INVALID_DAYS).into_response(StatusCode::BAD_REQUEST)
        }),
    }
}

/// Whole, non-negative day counts only. Anything above MAX_WINDOW_DAYS,
/// including values past u64::MAX, saturates to it.
fn parse_days(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let days = value.parse::<u64>().unwrap_or(u64::MAX);
    Some(days.min(u64::from(MAX_WINDOW_DAYS)) as u32)
}

fn fetch_failed(e: AnalyticsError) -> ApiError {
    tracing::error!("Failed to fetch analytics: {}", e);
    ErrorResponse::new(FETCH_FAILED).into_response(StatusCode::INTERNAL_SERVER_ERROR)
}
