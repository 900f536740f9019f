use crate::config::ProviderConfig;
use crate::error::RecipeError;
use crate::providers::{read_json_body, require_api_key, resolve_api_key, transport_error, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

pub struct OpenAIProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    json_mode: bool,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig) -> Self {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        OpenAIProvider {
            client: Client::new(),
            api_key: resolve_api_key(config, &["OPENAI_API_KEY"]),
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            json_mode: config.json_mode,
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.7,
            max_tokens: 2000,
            json_mode: true,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn ensure_configured(&self) -> Result<(), RecipeError> {
        require_api_key(self.api_key.as_deref(), "OPENAI_API_KEY").map(|_| ())
    }

    async fn complete(&self, prompt: &str) -> Result<String, RecipeError> {
        let api_key = require_api_key(self.api_key.as_deref(), "OPENAI_API_KEY")?;

        let mut body = json!({
            "model": self.model,
            "messages": [
                {"role": "user", "content": prompt}
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        });
        if self.json_mode {
            body["response_format"] = json!({"type": "json_object"});
        }

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(self.provider_name(), e))?;

        let response_body = read_json_body(self.provider_name(), response).await?;
        let completion = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                RecipeError::Provider(format!(
                    "Failed to extract content from OpenAI response: {}",
                    response_body
                ))
            })?
            .to_string();
        debug!("OpenAI completion: {}", completion);

        Ok(completion)
    }
}
