//! Content Generator Adapters.
//!
//! Implementations of the ContentGenerator port.
//!
//! ## Available Adapters
//!
//! - `MockContentGenerator` - Configurable mock for testing and offline runs
//! - `OpenAIContentGenerator` - OpenAI chat completions in JSON mode

mod mock_generator;
mod openai_generator;

pub use mock_generator::{MockContentGenerator, MockError, MockResponse};
pub use openai_generator::{OpenAIConfig, OpenAIContentGenerator};
