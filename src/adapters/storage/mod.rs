//! Storage Adapters
//!
//! Implementations of the SurveyStore port.
//!
//! ## Available Adapters
//!
//! - **FileSurveyStore** - Stores sessions and results as YAML files on disk
//! - **InMemorySurveyStore** - Stores everything in memory (testing/development)
//!
//! The PostgreSQL implementation lives in `adapters::postgres`.
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSurveyStore, InMemorySurveyStore};
//!
//! let store = FileSurveyStore::new("./data/survey");
//! let store = InMemorySurveyStore::new();
//! ```

mod file_survey_store;
mod in_memory_survey_store;

pub use file_survey_store::FileSurveyStore;
pub use in_memory_survey_store::InMemorySurveyStore;
