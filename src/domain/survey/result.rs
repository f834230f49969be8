//! Turn results and handler continuations.

use serde::Serialize;

use crate::domain::foundation::Percentage;

use super::component::UiComponent;
use super::errors::ValidationError;
use super::state::ConversationState;
use super::step_id::StepId;

/// What the engine hands back for one turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub assistant_message: String,
    pub ui_component: Option<UiComponent>,
    /// The step the client echoes back on its next turn.
    pub next_step_id: StepId,
    pub updated_state: ConversationState,
    pub is_complete: bool,
    pub progress: Percentage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl StepResult {
    /// A question for `step_id`. The state is moved onto that step.
    pub fn ask(
        step_id: &StepId,
        message: impl Into<String>,
        component: Option<UiComponent>,
        mut state: ConversationState,
    ) -> Self {
        state.current_step = step_id.clone();
        Self {
            assistant_message: message.into(),
            ui_component: component,
            next_step_id: step_id.clone(),
            updated_state: state,
            is_complete: false,
            progress: Percentage::ZERO,
            validation_error: None,
        }
    }

    /// Annotates the result with a rejected answer.
    pub fn with_validation_error(mut self, error: &ValidationError) -> Self {
        self.validation_error = Some(error.to_string());
        self
    }
}

/// How a handler wants the turn to continue.
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// Show this to the user.
    Answer(StepResult),
    /// Fall through to another step within the same turn, with no answer.
    Redirect {
        next: StepId,
        state: ConversationState,
    },
}

impl Continuation {
    pub fn redirect(next: &StepId, state: ConversationState) -> Self {
        Self::Redirect {
            next: next.clone(),
            state,
        }
    }
}
