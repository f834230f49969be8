//! Content generation configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ConfigValidationError;

/// Which content generator backs the generated steps
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    OpenAI,
    /// Canned responses, for local development without a key
    Mock,
}

/// Content generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    #[serde(default)]
    pub generator: GeneratorKind,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on a single generation call, in seconds
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
}

impl AiConfig {
    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key
            .as_ref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.generator == GeneratorKind::OpenAI && !self.has_openai() {
            return Err(ConfigValidationError::MissingRequired("SURVEY__AI__OPENAI_API_KEY"));
        }
        if self.generation_timeout_secs == 0 || self.generation_timeout_secs > 300 {
            return Err(ConfigValidationError::InvalidGenerationTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::default(),
            openai_api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            generation_timeout_secs: default_generation_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-5-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_generation_timeout() -> u64 {
    45
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: &str) -> AiConfig {
        AiConfig {
            openai_api_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.generator, GeneratorKind::OpenAI);
        assert_eq!(config.model, "gpt-5-mini");
        assert_eq!(config.generation_timeout(), Duration::from_secs(45));
        assert!(!config.has_openai());
    }

    #[test]
    fn test_openai_requires_key() {
        assert_eq!(
            AiConfig::default().validate(),
            Err(ConfigValidationError::MissingRequired("SURVEY__AI__OPENAI_API_KEY"))
        );
        assert!(with_key("   ").validate().is_err());
        assert!(with_key("sk-test").validate().is_ok());
    }

    #[test]
    fn test_mock_generator_needs_no_key() {
        let config = AiConfig {
            generator: GeneratorKind::Mock,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generation_timeout_bounds() {
        let config = AiConfig {
            generation_timeout_secs: 0,
            ..with_key("sk-test")
        };
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidGenerationTimeout)
        );
    }
}
