//! In-memory Survey Store Adapter
//!
//! Keeps sessions and results in memory. Used for tests and local runs;
//! everything is lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::SessionId;
use crate::domain::survey::ConversationState;
use crate::ports::{PersistenceError, SurveyResult, SurveyStore};

#[derive(Debug, Clone, Default)]
pub struct InMemorySurveyStore {
    sessions: Arc<RwLock<HashMap<SessionId, ConversationState>>>,
    results: Arc<RwLock<HashMap<SessionId, SurveyResult>>>,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of mirrored sessions (for testing)
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of stored results (for testing)
    pub async fn result_count(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait]
impl SurveyStore for InMemorySurveyStore {
    async fn save_session(
        &self,
        session_id: SessionId,
        state: &ConversationState,
    ) -> Result<(), PersistenceError> {
        self.sessions.write().await.insert(session_id, state.clone());
        Ok(())
    }

    async fn load_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<ConversationState>, PersistenceError> {
        Ok(self.sessions.read().await.get(&session_id).cloned())
    }

    async fn append_final_result(&self, result: SurveyResult) -> Result<(), PersistenceError> {
        self.results.write().await.insert(result.session_id, result);
        Ok(())
    }

    async fn list_results(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<SurveyResult>, PersistenceError> {
        let mut results: Vec<_> = self.results.read().await.values().cloned().collect();
        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(results.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_result(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SurveyResult>, PersistenceError> {
        Ok(self.results.read().await.get(&session_id).cloned())
    }
}
