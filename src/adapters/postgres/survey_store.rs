//! PostgreSQL implementation of SurveyStore.
//!
//! State and collected data are stored as JSONB so the schema does not
//! follow every change to the step graph.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;

use crate::domain::foundation::SessionId;
use crate::domain::survey::ConversationState;
use crate::ports::{PersistenceError, SurveyResult, SurveyStore};

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// PostgreSQL implementation of SurveyStore.
#[derive(Clone)]
pub struct PostgresSurveyStore {
    pool: PgPool,
}

impl PostgresSurveyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies pending migrations.
    pub async fn migrate(&self) -> Result<(), PersistenceError> {
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| PersistenceError::DatabaseError(format!("Migration failed: {}", e)))
    }
}

fn db_error(action: &str, e: sqlx::Error) -> PersistenceError {
    PersistenceError::DatabaseError(format!("Failed to {}: {}", action, e))
}

fn row_to_result(row: PgRow) -> Result<SurveyResult, PersistenceError> {
    let session_id: uuid::Uuid = row
        .try_get("session_id")
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;
    let Json(collected_data): Json<BTreeMap<String, Value>> = row
        .try_get("collected_data")
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;
    let completed_at: DateTime<Utc> = row
        .try_get("completed_at")
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

    Ok(SurveyResult {
        session_id: SessionId::from_uuid(session_id),
        collected_data,
        completed_at,
    })
}

#[async_trait]
impl SurveyStore for PostgresSurveyStore {
    async fn save_session(
        &self,
        session_id: SessionId,
        state: &ConversationState,
    ) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO survey_sessions (session_id, state, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (session_id)
            DO UPDATE SET state = EXCLUDED.state, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(Json(state))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("save session", e))?;

        Ok(())
    }

    async fn load_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<ConversationState>, PersistenceError> {
        let row = sqlx::query("SELECT state FROM survey_sessions WHERE session_id = $1")
            .bind(session_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("load session", e))?;

        match row {
            Some(row) => {
                let Json(state): Json<ConversationState> = row
                    .try_get("state")
                    .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn append_final_result(&self, result: SurveyResult) -> Result<(), PersistenceError> {
        sqlx::query(
            r#"
            INSERT INTO survey_results (session_id, collected_data, completed_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_id) DO NOTHING
            "#,
        )
        .bind(result.session_id.as_uuid())
        .bind(Json(&result.collected_data))
        .bind(result.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert result", e))?;

        Ok(())
    }

    async fn list_results(
        &self,
        limit: usize,
        skip: usize,
    ) -> Result<Vec<SurveyResult>, PersistenceError> {
        let rows = sqlx::query(
            r#"
            SELECT session_id, collected_data, completed_at
            FROM survey_results
            ORDER BY completed_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(skip).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list results", e))?;

        rows.into_iter().map(row_to_result).collect()
    }

    async fn find_result(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SurveyResult>, PersistenceError> {
        let row = sqlx::query(
            r#"
            SELECT session_id, collected_data, completed_at
            FROM survey_results
            WHERE session_id = $1
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch result", e))?;

        row.map(row_to_result).transpose()
    }
}
