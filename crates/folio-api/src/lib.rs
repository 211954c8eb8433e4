// Folio Analytics API Library
// Decision: Shared library for binaries (API server, export-openapi) and integration tests

// API routes and types (shared for OpenAPI generation)
pub mod api;

// Environment configuration
pub mod config;

// Services layer
pub mod services;

// OpenAPI spec generation
pub mod openapi;

use axum::http::{header, Method};
use axum::{extract::State, routing::get, Json, Router};
use folio_core::AnalyticsStore;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::ServerConfig;
pub use openapi::ApiDoc;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    storage: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: state.storage,
    })
}

/// Assemble the full HTTP application.
///
/// `/health` and the Swagger UI are mounted at the root; analytics routes are
/// nested under `config.api_prefix`.
pub fn build_app(
    store: Arc<dyn AnalyticsStore>,
    storage: &'static str,
    config: &ServerConfig,
) -> Router {
    let api_routes = api::analytics::routes(api::analytics::AppState::new(store));
    let api_routes = match config.api_prefix.as_str() {
        "" => api_routes,
        prefix => Router::new().nest(prefix, api_routes),
    };

    let app = Router::new()
        .route("/health", get(health).with_state(HealthState { storage }))
        .merge(api_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if config.cors_origins.is_empty() {
        app
    } else {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN]),
        )
    };

    app.layer(TraceLayer::new_for_http())
}
