//! Liveness endpoint.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SERVICE_NAME: &str = "workflow-survey";

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        timestamp: Utc::now(),
    })
}
