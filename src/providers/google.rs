use crate::config::ProviderConfig;
use crate::error::RecipeError;
use crate::providers::{read_json_body, require_api_key, resolve_api_key, transport_error, LlmProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::json;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    json_mode: bool,
}

impl GoogleProvider {
    /// Create a new Google Gemini provider from configuration.
    ///
    /// A missing API key is not an error here; it is reported by
    /// `ensure_configured` when a recipe is requested.
    pub fn new(config: &ProviderConfig) -> Self {
        GoogleProvider {
            client: Client::new(),
            api_key: resolve_api_key(config, &["GEMINI_API_KEY", "GOOGLE_API_KEY"]),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            json_mode: config.json_mode,
        }
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: Option<String>, base_url: String, model: String) -> Self {
        GoogleProvider {
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
impl LlmProvider for GoogleProvider {
    fn provider_name(&self) -> &str {
        "google"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn ensure_configured(&self) -> Result<(), RecipeError> {
        require_api_key(self.api_key.as_deref(), "GEMINI_API_KEY").map(|_| ())
    }

    async fn complete(&self, prompt: &str) -> Result<String, RecipeError> {
        let api_key = require_api_key(self.api_key.as_deref(), "GEMINI_API_KEY")?;

        // Google Gemini API endpoint
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let mut generation_config = json!({
            "temperature": self.temperature,
            "maxOutputTokens": self.max_tokens
        });
        if self.json_mode {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&json!({
                "contents": [{
                    "parts": [{ "text": prompt }]
                }],
                "generationConfig": generation_config
            }))
            .send()
            .await
            .map_err(|e| transport_error(self.provider_name(), e))?;

        let response_body = read_json_body(self.provider_name(), response).await?;

        let parts = response_body["candidates"][0]["content"]["parts"]
            .as_array()
            .ok_or_else(|| {
                let reason = response_body["promptFeedback"]["blockReason"]
                    .as_str()
                    .or_else(|| response_body["candidates"][0]["finishReason"].as_str())
                    .unwrap_or("no candidates returned");
                RecipeError::Provider(format!("Google Gemini returned no content: {}", reason))
            })?;

        // Gemini may split a completion across several parts
        let text: String = parts
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect();
        debug!("Gemini completion: {}", text);

        Ok(text)
    }
}
