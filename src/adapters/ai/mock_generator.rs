//! Mock content generator for testing.
//!
//! Provides a configurable mock implementation of the ContentGenerator
//! port, allowing tests to run without calling a real language model.
//!
//! # Features
//!
//! - Pre-configured raw JSON replies, parsed exactly like a real provider's
//! - Simulated delays for timeout testing
//! - Error injection
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let generator = MockContentGenerator::new()
//!     .with_json(json!({"assistantMessage": "Which role?", "component": {...}}))
//!     .with_delay(Duration::from_millis(100));
//!
//! let content = generator.generate(request).await?;
//! assert_eq!(content.assistant_message, "Which role?");
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::survey::GenerationError;
use crate::ports::{ContentGenerator, GeneratedContent, GenerationRequest};

/// Mock content generator for testing.
///
/// Replies are consumed in order; once the queue is empty every call gets a
/// generic text-input question.
#[derive(Debug, Clone, Default)]
pub struct MockContentGenerator {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<GenerationRequest>>>,
}

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Raw model output, run through the normal JSON validation.
    Raw(String),
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    /// Simulate provider unavailable.
    Unavailable { message: String },
    /// Simulate a provider-side timeout.
    Timeout { timeout_secs: u64 },
    /// Simulate a reply that is not valid JSON.
    Malformed { message: String },
}

impl From<MockError> for GenerationError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::Unavailable { message } => GenerationError::Unavailable(message),
            MockError::Timeout { timeout_secs } => GenerationError::Timeout(timeout_secs),
            MockError::Malformed { message } => GenerationError::Malformed(message),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn default_reply() -> String {
    json!({
        "assistantMessage": "Mock question",
        "component": {"type": "input", "props": {"placeholder": "Type your answer..."}}
    })
    .to_string()
}

impl MockContentGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw reply.
    pub fn with_response(self, raw: impl Into<String>) -> Self {
        lock(&self.responses).push_back(MockResponse::Raw(raw.into()));
        self
    }

    /// Queues a JSON reply.
    pub fn with_json(self, reply: Value) -> Self {
        self.with_response(reply.to_string())
    }

    /// Queues an error.
    pub fn with_error(self, error: MockError) -> Self {
        lock(&self.responses).push_back(MockResponse::Error(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<GenerationRequest> {
        lock(&self.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn next_response(&self) -> MockResponse {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| MockResponse::Raw(default_reply()))
    }
}

#[async_trait]
impl ContentGenerator for MockContentGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, GenerationError> {
        lock(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response() {
            MockResponse::Raw(raw) => GeneratedContent::from_json_str(&raw),
            MockResponse::Error(err) => Err(err.into()),
        }
    }
}
