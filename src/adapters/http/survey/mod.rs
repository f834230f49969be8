//! HTTP adapter for survey endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, InitSurveyResponse, ProcessTurnRequest, ProcessTurnResponse,
    ResultsListResponse, ResultsQueryParams,
};
pub use handlers::SurveyHandlers;
pub use routes::survey_routes;
