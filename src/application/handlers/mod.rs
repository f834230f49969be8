//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod survey;

pub use survey::{
    GetResultHandler, GetResultQuery, ListResultsHandler, ListResultsQuery, ProcessTurnCommand,
    ProcessTurnHandler, ResultsPage, StartSurveyHandler, StartSurveyResult,
};
