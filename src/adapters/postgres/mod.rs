//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSurveyStore` - Session mirror and completed results (JSONB)

mod survey_store;

pub use survey_store::{PostgresSurveyStore, MIGRATOR};
