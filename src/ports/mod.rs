//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ContentGenerator` - Language model producing dynamic questions
//! - `SurveyStore` - Best-effort session mirror and completed results

mod content_generator;
mod survey_store;

pub use content_generator::{ContentGenerator, GeneratedContent, GenerationRequest};
pub use survey_store::{PersistenceError, SurveyResult, SurveyStore};
