//! HTTP routes for survey endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_result, init_survey, list_results, process_turn, SurveyHandlers};

/// Creates the survey router with all endpoints.
pub fn survey_routes(handlers: SurveyHandlers) -> Router {
    Router::new()
        .route("/init", post(init_survey))
        .route("/process", post(process_turn))
        .route("/results", get(list_results))
        .route("/results/:session_id", get(get_result))
        .with_state(handlers)
}
