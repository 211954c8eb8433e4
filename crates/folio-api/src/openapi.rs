// OpenAPI specification generation
//
// Shared by the API server (Swagger UI) and the export-openapi binary.

use crate::api;
use crate::api::analytics::{RecordEventRequest, RecordEventResponse};
use crate::api::ErrorResponse;
use folio_core::{
    AnalyticsSummary, BrowserCount, DailyPoint, DailySeries, DailyTotals, DeviceCount,
    OverviewStats, PageCount,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Folio analytics API
#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api", description = "Default API prefix"),
    ),
    paths(
        api::analytics::record_event,
        api::analytics::get_summary,
        api::analytics::get_daily,
        api::analytics::get_overview,
    ),
    components(
        schemas(
            RecordEventRequest, RecordEventResponse, ErrorResponse,
            AnalyticsSummary, PageCount, DeviceCount, BrowserCount,
            DailySeries, DailyPoint, DailyTotals,
            OverviewStats,
        )
    ),
    tags(
        (name = "analytics", description = "Event tracking and aggregation endpoints"),
    ),
    info(
        title = "Folio Analytics API",
        version = "0.1.0",
        description = "Privacy-light visitor analytics for a portfolio site"
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI spec as a pretty-printed JSON string
    pub fn to_json() -> serde_json::Result<String> {
        Self::openapi().to_pretty_json()
    }
}
