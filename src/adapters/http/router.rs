//! Top-level application router.

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::ServerConfig;

use super::health::health;
use super::survey::{survey_routes, SurveyHandlers};

/// Mounts the survey API under `/api/survey` with tracing, CORS and a
/// request timeout.
pub fn app_router(survey: SurveyHandlers, server: &ServerConfig) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/survey", survey_routes(survey))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let configured = server.cors_origins_list();
    if configured.is_empty() {
        // Same-origin only in production; anything goes in development.
        return if server.is_production() {
            CorsLayer::new()
        } else {
            CorsLayer::permissive()
        };
    }

    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
