use crate::config::{AppConfig, ProviderConfig};
use crate::error::RecipeError;
use crate::providers::{AnthropicProvider, GoogleProvider, LlmProvider, OpenAIProvider};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LlmProvider>, RecipeError> {
        match provider_name {
            "google" | "gemini" => Ok(Box::new(GoogleProvider::new(config))),
            "openai" => Ok(Box::new(OpenAIProvider::new(config))),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config))),
            _ => Err(RecipeError::Configuration(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(config: &AppConfig) -> Result<Box<dyn LlmProvider>, RecipeError> {
        let provider_name = &config.default_provider;
        let provider_config = config.default_provider_config().ok_or_else(|| {
            RecipeError::Configuration(format!(
                "Default provider '{}' not found in configuration",
                provider_name
            ))
        })?;

        Self::create(provider_name, &provider_config)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai", "anthropic"]
    }
}
