//! Request and response DTOs for survey endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::handlers::survey::{ResultsPage, StartSurveyResult};
use crate::domain::foundation::Percentage;
use crate::domain::survey::{
    ConfigurationError, ConversationState, GenerationError, StepId, StepResult, UiComponent,
};
use crate::ports::SurveyResult;

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/survey/process`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTurnRequest {
    pub session_id: String,
    /// Defaults to `conversationState.currentStep`.
    #[serde(default)]
    pub step_id: Option<String>,
    #[serde(default)]
    pub user_response: Option<Value>,
    pub conversation_state: ConversationState,
}

/// Query parameters for `GET /api/survey/results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultsQueryParams {
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSurveyResponse {
    pub session_id: String,
    pub assistant_message: String,
    pub component: Option<UiComponent>,
    pub conversation_state: ConversationState,
    pub is_complete: bool,
    pub progress: Percentage,
    /// Display name of the phase the shown step belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_name: Option<&'static str>,
}

/// Header name for the state's current phase.
fn phase_name(state: &ConversationState) -> Option<&'static str> {
    state.current_phase.map(|phase| phase.display_name())
}

impl From<StartSurveyResult> for InitSurveyResponse {
    fn from(result: StartSurveyResult) -> Self {
        let step = result.step;
        Self {
            session_id: result.session_id.to_string(),
            phase_name: phase_name(&step.updated_state),
            assistant_message: step.assistant_message,
            component: step.ui_component,
            conversation_state: step.updated_state,
            is_complete: step.is_complete,
            progress: step.progress,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessTurnResponse {
    pub assistant_message: String,
    pub component: Option<UiComponent>,
    pub next_step_id: StepId,
    pub conversation_state: ConversationState,
    pub is_complete: bool,
    pub progress: Percentage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl From<StepResult> for ProcessTurnResponse {
    fn from(result: StepResult) -> Self {
        Self {
            phase_name: phase_name(&result.updated_state),
            assistant_message: result.assistant_message,
            component: result.ui_component,
            next_step_id: result.next_step_id,
            conversation_state: result.updated_state,
            is_complete: result.is_complete,
            progress: result.progress,
            validation_error: result.validation_error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsListResponse {
    pub results: Vec<SurveyResult>,
    pub count: usize,
    pub limit: usize,
    pub skip: usize,
}

impl From<ResultsPage> for ResultsListResponse {
    fn from(page: ResultsPage) -> Self {
        Self {
            count: page.results.len(),
            results: page.results,
            limit: page.limit,
            skip: page.skip,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            retryable: false,
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn configuration(error: &ConfigurationError) -> Self {
        Self::new("CONFIGURATION_ERROR", error.to_string())
    }

    /// The same turn may be resubmitted.
    pub fn generation(error: &GenerationError) -> Self {
        Self {
            retryable: true,
            ..Self::new("GENERATION_FAILED", error.to_string())
        }
    }
}
