//! GetResultHandler - Query handler for one completed survey.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::ports::{PersistenceError, SurveyResult, SurveyStore};

#[derive(Debug, Clone)]
pub struct GetResultQuery {
    pub session_id: SessionId,
}

pub struct GetResultHandler {
    store: Arc<dyn SurveyStore>,
}

impl GetResultHandler {
    pub fn new(store: Arc<dyn SurveyStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetResultQuery) -> Result<Option<SurveyResult>, PersistenceError> {
        self.store.find_result(query.session_id).await
    }
}
