//! HTTP adapters - REST API implementations.

mod health;
mod router;
pub mod survey;

pub use health::{health, HealthResponse, SERVICE_NAME};
pub use router::app_router;
pub use survey::{survey_routes, SurveyHandlers};
