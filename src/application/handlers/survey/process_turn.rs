//! ProcessTurnHandler - Command handler for one survey turn.
//!
//! Runs the step processor, then mirrors the new state. The final result is
//! stored exactly once: on the turn where the survey becomes complete.
//! Persistence is best-effort and never fails the turn.

use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::foundation::SessionId;
use crate::domain::survey::{ConversationState, EngineError, StepProcessor, StepResult};
use crate::ports::{SurveyResult, SurveyStore};

/// Command to process one turn.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub session_id: SessionId,
    /// Step the answer belongs to. Defaults to the state's current step.
    pub step_id: Option<String>,
    pub user_response: Option<Value>,
    pub state: ConversationState,
}

/// Handler for processing turns.
pub struct ProcessTurnHandler {
    processor: Arc<StepProcessor>,
    store: Arc<dyn SurveyStore>,
}

impl ProcessTurnHandler {
    pub fn new(processor: Arc<StepProcessor>, store: Arc<dyn SurveyStore>) -> Self {
        Self { processor, store }
    }

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> Result<StepResult, EngineError> {
        let step_id = cmd
            .step_id
            .as_deref()
            .unwrap_or(cmd.state.current_step.as_str());

        let result = self
            .processor
            .process(step_id, cmd.user_response.as_ref(), &cmd.state)
            .await?;

        let session_id = cmd.session_id;
        if let Err(err) = self.store.save_session(session_id, &result.updated_state).await {
            warn!(%session_id, error = %err, "Failed to mirror session state");
        }

        if result.is_complete && !cmd.state.is_complete() {
            let final_result = SurveyResult::new(session_id, result.updated_state.collected_data.clone());
            match self.store.append_final_result(final_result).await {
                Ok(()) => info!(%session_id, "Survey completed"),
                Err(err) => warn!(%session_id, error = %err, "Failed to store final result"),
            }
        }

        Ok(result)
    }
}
