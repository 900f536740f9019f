use crate::config::ProviderConfig;
use crate::error::RecipeError;
use crate::providers::{read_json_body, require_api_key, resolve_api_key, transport_error, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

/// Anthropic has no JSON response mode, so completions always go through
/// the tolerant extraction step.
pub struct AnthropicProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig) -> Self {
        AnthropicProvider {
            client: Client::new(),
            api_key: resolve_api_key(config, &["ANTHROPIC_API_KEY"]),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String, model: String) -> Self {
        AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn ensure_configured(&self) -> Result<(), RecipeError> {
        require_api_key(self.api_key.as_deref(), "ANTHROPIC_API_KEY").map(|_| ())
    }

    async fn complete(&self, prompt: &str) -> Result<String, RecipeError> {
        let api_key = require_api_key(self.api_key.as_deref(), "ANTHROPIC_API_KEY")?;

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt
                    }
                ]
            }))
            .send()
            .await
            .map_err(|e| transport_error(self.provider_name(), e))?;

        let response_body = read_json_body(self.provider_name(), response).await?;

        let completion = response_body["content"]
            .as_array()
            .and_then(|blocks| {
                blocks
                    .iter()
                    .find(|block| block["type"] == "text")
                    .and_then(|block| block["text"].as_str())
            })
            .ok_or_else(|| {
                RecipeError::Provider(format!(
                    "Failed to extract content from Anthropic response: {}",
                    response_body
                ))
            })?
            .to_string();
        debug!("Anthropic completion: {}", completion);

        Ok(completion)
    }
}
