//! OpenAI Content Generator - ContentGenerator backed by chat completions.
//!
//! Sends the step's system and user prompts with `response_format =
//! json_object` and hands the message content to
//! [`GeneratedContent::from_json_str`] for validation.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAIConfig::new(api_key)
//!     .with_model("gpt-5-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let generator = OpenAIContentGenerator::new(config)?;
//! ```
//!
//! Failed calls are not retried here; the client resubmits the turn.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::survey::GenerationError;
use crate::ports::{ContentGenerator, GeneratedContent, GenerationRequest};

/// Configuration for the OpenAI generator.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    pub model: String,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// HTTP timeout. The engine applies its own generation timeout on top.
    pub timeout: Duration,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-5-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

pub struct OpenAIContentGenerator {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIContentGenerator {
    pub fn new(config: OpenAIConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    fn to_openai_request(&self, request: &GenerationRequest) -> OpenAIRequest {
        OpenAIRequest {
            model: self.config.model.clone(),
            messages: vec![
                OpenAIMessage {
                    role: "system".to_string(),
                    content: request.system_prompt.clone(),
                },
                OpenAIMessage {
                    role: "user".to_string(),
                    content: request.user_prompt.clone(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        }
    }

    async fn send_request(&self, request: &GenerationRequest) -> Result<Response, GenerationError> {
        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&self.to_openai_request(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout(self.config.timeout.as_secs())
                } else if e.is_connect() {
                    GenerationError::Unavailable(format!("Connection failed: {}", e))
                } else {
                    GenerationError::Unavailable(e.to_string())
                }
            })
    }

    async fn handle_response_status(response: Response) -> Result<Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(status_error(status.as_u16(), &error_body))
    }
}

fn status_error(status: u16, body: &str) -> GenerationError {
    match status {
        401 | 403 => GenerationError::Unavailable("Authentication failed".to_string()),
        429 => GenerationError::Unavailable("Rate limited".to_string()),
        400 => GenerationError::Malformed(format!("Request rejected: {}", body)),
        _ => GenerationError::Unavailable(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Pulls the message content out of a completions reply.
fn message_content(response: OpenAIResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| GenerationError::Malformed("Empty response from model".to_string()))
}

#[async_trait]
impl ContentGenerator for OpenAIContentGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GeneratedContent, GenerationError> {
        debug!(step_id = %request.step_id, model = %self.config.model, "Calling OpenAI");

        let response = self.send_request(&request).await?;
        let response = Self::handle_response_status(response).await?;
        let body: OpenAIResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(format!("Failed to parse response: {}", e)))?;

        let content = message_content(body)?;
        GeneratedContent::from_json_str(&content).map_err(|err| {
            warn!(step_id = %request.step_id, error = %err, "Rejected generated content");
            err
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// OpenAI wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}
