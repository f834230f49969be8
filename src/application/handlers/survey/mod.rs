//! Survey command and query handlers.

mod get_result;
mod list_results;
mod process_turn;
mod start_survey;

pub use get_result::{GetResultHandler, GetResultQuery};
pub use list_results::{ListResultsHandler, ListResultsQuery, ResultsPage, DEFAULT_LIMIT, MAX_LIMIT};
pub use process_turn::{ProcessTurnCommand, ProcessTurnHandler};
pub use start_survey::{StartSurveyHandler, StartSurveyResult};
