//! ListResultsHandler - Query handler for completed surveys.

use std::sync::Arc;

use crate::ports::{PersistenceError, SurveyResult, SurveyStore};

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 200;

/// Query for a page of results, newest first.
#[derive(Debug, Clone, Default)]
pub struct ListResultsQuery {
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ResultsPage {
    pub results: Vec<SurveyResult>,
    pub limit: usize,
    pub skip: usize,
}

pub struct ListResultsHandler {
    store: Arc<dyn SurveyStore>,
}

impl ListResultsHandler {
    pub fn new(store: Arc<dyn SurveyStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: ListResultsQuery) -> Result<ResultsPage, PersistenceError> {
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let skip = query.skip.unwrap_or(0);

        let results = self.store.list_results(limit, skip).await?;
        Ok(ResultsPage { results, limit, skip })
    }
}
