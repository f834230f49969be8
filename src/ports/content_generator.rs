//! Content Generator Port - Interface for the question-generating language model.
//!
//! Dynamic survey steps ask an external model for a question and a UI
//! component. The model answers in strict JSON; this module owns the
//! coercion of that JSON into domain types so the engine never handles
//! untyped component data.
//!
//! # Example
//!
//! ```ignore
//! let content = generator
//!     .generate(GenerationRequest::new("role", system_prompt, user_prompt))
//!     .await?;
//! assert!(content.component.is_some());
//! ```

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::survey::{GenerationError, UiComponent};

/// Port for generating dynamic question content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produces a question for one step.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the provider cannot be reached or refuses the call
    /// - `Malformed` / `MissingField` / `InvalidComponent` if the reply does
    ///   not fit the expected shape
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, GenerationError>;
}

/// Prompt pair for one generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Step the content is for; used for logging and test assertions.
    pub step_id: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl GenerationRequest {
    pub fn new(
        step_id: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

/// Validated generator output.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedContent {
    pub assistant_message: String,
    pub component: Option<UiComponent>,
    /// Successor the model suggested. Advisory only.
    pub next_step: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContent {
    assistant_message: Option<String>,
    #[serde(default)]
    component: Option<Value>,
    #[serde(default)]
    next_step: Option<String>,
}

impl GeneratedContent {
    /// Parses and validates a raw JSON reply.
    ///
    /// `assistantMessage` is required and must not be blank. A present
    /// `component` must match the closed component union and be renderable.
    pub fn from_json_str(raw: &str) -> Result<Self, GenerationError> {
        let parsed: RawContent =
            serde_json::from_str(raw).map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let assistant_message = parsed
            .assistant_message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| GenerationError::MissingField("assistantMessage".to_string()))?;

        let component = match parsed.component {
            None | Some(Value::Null) => None,
            Some(value) => {
                let component: UiComponent = serde_json::from_value(value)
                    .map_err(|e| GenerationError::InvalidComponent(e.to_string()))?;
                component
                    .check_renderable()
                    .map_err(GenerationError::InvalidComponent)?;
                Some(component)
            }
        };

        Ok(Self {
            assistant_message,
            component,
            next_step: parsed.next_step.filter(|s| !s.trim().is_empty()),
        })
    }
}
