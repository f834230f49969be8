//! StartSurveyHandler - Command handler for opening a survey session.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::foundation::SessionId;
use crate::domain::survey::{EngineError, StepProcessor, StepResult};
use crate::ports::SurveyStore;

/// Result of opening a session.
#[derive(Debug, Clone)]
pub struct StartSurveyResult {
    pub session_id: SessionId,
    pub step: StepResult,
}

/// Handler for opening survey sessions.
pub struct StartSurveyHandler {
    processor: Arc<StepProcessor>,
    store: Arc<dyn SurveyStore>,
}

impl StartSurveyHandler {
    pub fn new(processor: Arc<StepProcessor>, store: Arc<dyn SurveyStore>) -> Self {
        Self { processor, store }
    }

    pub async fn handle(&self) -> Result<StartSurveyResult, EngineError> {
        let session_id = SessionId::new();
        let step = self.processor.start().await?;

        if let Err(err) = self.store.save_session(session_id, &step.updated_state).await {
            warn!(%session_id, error = %err, "Failed to mirror new session");
        }

        info!(%session_id, "Survey session started");
        Ok(StartSurveyResult { session_id, step })
    }
}
