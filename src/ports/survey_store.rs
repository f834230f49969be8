//! Survey Store Port - Best-effort persistence of sessions and results.
//!
//! The client is the source of truth for the conversation, so nothing in
//! the engine depends on these writes succeeding. Stores mirror in-progress
//! state for support/debugging and keep completed results for the
//! dashboard.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::foundation::SessionId;
use crate::domain::survey::ConversationState;

/// Errors that can occur during survey persistence.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Failed to serialize record: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize record: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// A completed survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResult {
    pub session_id: SessionId,
    pub collected_data: BTreeMap<String, Value>,
    pub completed_at: DateTime<Utc>,
}

impl SurveyResult {
    pub fn new(session_id: SessionId, collected_data: BTreeMap<String, Value>) -> Self {
        Self {
            session_id,
            collected_data,
            completed_at: Utc::now(),
        }
    }
}

/// Port for persisting survey sessions and final results.
#[async_trait]
pub trait SurveyStore: Send + Sync {
    /// Mirrors the latest state of a session, replacing any previous copy.
    async fn save_session(
        &self,
        session_id: SessionId,
        state: &ConversationState,
    ) -> Result<(), PersistenceError>;

    /// Loads the mirrored state, if any.
    async fn load_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<ConversationState>, PersistenceError>;

    /// Stores a completed survey. Called once per session.
    async fn append_final_result(&self, result: SurveyResult) -> Result<(), PersistenceError>;

    /// Completed results, newest first.
    async fn list_results(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<SurveyResult>, PersistenceError>;

    async fn find_result(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SurveyResult>, PersistenceError>;
}
