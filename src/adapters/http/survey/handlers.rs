//! HTTP handlers for survey endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::application::handlers::survey::{
    GetResultHandler, GetResultQuery, ListResultsHandler, ListResultsQuery, ProcessTurnCommand,
    ProcessTurnHandler, StartSurveyHandler,
};
use crate::domain::foundation::SessionId;
use crate::domain::survey::EngineError;
use crate::ports::PersistenceError;

use super::dto::{
    ErrorResponse, InitSurveyResponse, ProcessTurnRequest, ProcessTurnResponse,
    ResultsListResponse, ResultsQueryParams,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SurveyHandlers {
    start_handler: Arc<StartSurveyHandler>,
    process_handler: Arc<ProcessTurnHandler>,
    list_handler: Arc<ListResultsHandler>,
    get_handler: Arc<GetResultHandler>,
}

impl SurveyHandlers {
    pub fn new(
        start_handler: Arc<StartSurveyHandler>,
        process_handler: Arc<ProcessTurnHandler>,
        list_handler: Arc<ListResultsHandler>,
        get_handler: Arc<GetResultHandler>,
    ) -> Self {
        Self {
            start_handler,
            process_handler,
            list_handler,
            get_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/survey/init - Open a session at the intro step
pub async fn init_survey(State(handlers): State<SurveyHandlers>) -> Response {
    match handlers.start_handler.handle().await {
        Ok(result) => {
            let response: InitSurveyResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_engine_error(e),
    }
}

/// POST /api/survey/process - Submit one turn
pub async fn process_turn(
    State(handlers): State<SurveyHandlers>,
    body: Result<Json<ProcessTurnRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let session_id = match req.session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid session ID"),
    };

    let cmd = ProcessTurnCommand {
        session_id,
        step_id: req.step_id,
        user_response: req.user_response,
        state: req.conversation_state,
    };

    match handlers.process_handler.handle(cmd).await {
        Ok(result) => {
            let response: ProcessTurnResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_engine_error(e),
    }
}

/// GET /api/survey/results - Completed surveys, newest first
pub async fn list_results(
    State(handlers): State<SurveyHandlers>,
    Query(params): Query<ResultsQueryParams>,
) -> Response {
    let query = ListResultsQuery {
        limit: params.limit,
        skip: params.skip,
    };

    match handlers.list_handler.handle(query).await {
        Ok(page) => {
            let response: ResultsListResponse = page.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_persistence_error(e),
    }
}

/// GET /api/survey/results/:session_id - One completed survey
pub async fn get_result(
    State(handlers): State<SurveyHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let parsed = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return bad_request("Invalid session ID"),
    };

    match handlers.get_handler.handle(GetResultQuery { session_id: parsed }).await {
        Ok(Some(result)) => (StatusCode::OK, Json(result)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Survey result", &session_id)),
        )
            .into_response(),
        Err(e) => handle_persistence_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(message)),
    )
        .into_response()
}

fn handle_engine_error(error: EngineError) -> Response {
    match error {
        EngineError::Configuration(err) => {
            error!(error = %err, "Step graph misconfigured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::configuration(&err)),
            )
                .into_response()
        }
        EngineError::Generation(err) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse::generation(&err)),
        )
            .into_response(),
    }
}

fn handle_persistence_error(error: PersistenceError) -> Response {
    error!(error = %error, "Failed to read survey results");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal("Failed to read survey results")),
    )
        .into_response()
}
