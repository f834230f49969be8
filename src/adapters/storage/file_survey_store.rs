//! File-based Survey Store Adapter
//!
//! Stores session mirrors and completed results as YAML files on disk:
//!
//! ```text
//! <base>/sessions/<session_id>.yaml
//! <base>/results/<session_id>.yaml
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

use crate::domain::foundation::SessionId;
use crate::domain::survey::ConversationState;
use crate::ports::{PersistenceError, SurveyResult, SurveyStore};

/// File-based storage for survey sessions and results
#[derive(Debug, Clone)]
pub struct FileSurveyStore {
    base_path: PathBuf,
}

impl FileSurveyStore {
    /// Create a new file store with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSurveyStore::new("./data/survey");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn sessions_dir(&self) -> PathBuf {
        self.base_path.join("sessions")
    }

    fn results_dir(&self) -> PathBuf {
        self.base_path.join("results")
    }

    fn session_path(&self, session_id: SessionId) -> PathBuf {
        self.sessions_dir().join(format!("{}.yaml", session_id))
    }

    fn result_path(&self, session_id: SessionId) -> PathBuf {
        self.results_dir().join(format!("{}.yaml", session_id))
    }

    async fn write_yaml<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), PersistenceError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| PersistenceError::IoError(e.to_string()))?;
        }

        let yaml = serde_yaml::to_string(value)
            .map_err(|e| PersistenceError::SerializationFailed(e.to_string()))?;

        fs::write(path, yaml)
            .await
            .map_err(|e| PersistenceError::IoError(e.to_string()))
    }

    async fn read_yaml<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>, PersistenceError> {
        if !path.exists() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| PersistenceError::IoError(e.to_string()))?;

        serde_yaml::from_str(&yaml)
            .map(Some)
            .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))
    }
}

#[async_trait]
impl SurveyStore for FileSurveyStore {
    async fn save_session(
        &self,
        session_id: SessionId,
        state: &ConversationState,
    ) -> Result<(), PersistenceError> {
        self.write_yaml(&self.session_path(session_id), state).await
    }

    async fn load_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<ConversationState>, PersistenceError> {
        self.read_yaml(&self.session_path(session_id)).await
    }

    async fn append_final_result(&self, result: SurveyResult) -> Result<(), PersistenceError> {
        self.write_yaml(&self.result_path(result.session_id), &result).await
    }

    async fn list_results(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<SurveyResult>, PersistenceError> {
        let dir = self.results_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| PersistenceError::IoError(e.to_string()))?;

        let mut results = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PersistenceError::IoError(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("yaml") {
                continue;
            }
            // One unreadable file should not hide every other result.
            match self.read_yaml::<SurveyResult>(&path).await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(err) => warn!(path = %path.display(), error = %err, "Skipping unreadable result"),
            }
        }

        results.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(results.into_iter().skip(skip).take(limit).collect())
    }

    async fn find_result(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SurveyResult>, PersistenceError> {
        self.read_yaml(&self.result_path(session_id)).await
    }
}
