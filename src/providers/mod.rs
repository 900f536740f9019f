mod anthropic;
mod factory;
mod google;
mod open_ai;
pub mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_recipe_prompt, RECIPE_GENERATION_PROMPT};

use crate::config::ProviderConfig;
use crate::error::RecipeError;
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Response;
use serde_json::Value;

/// Unified trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Check that the provider can make a request at all.
    ///
    /// Called before any network I/O so that a missing credential is reported
    /// as a configuration problem instead of a failed call.
    fn ensure_configured(&self) -> Result<(), RecipeError> {
        Ok(())
    }

    /// Send a single prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String, RecipeError>;
}

/// Resolve the API key from configuration, then the given environment variables.
/// Blank values count as missing.
pub(crate) fn resolve_api_key(config: &ProviderConfig, env_vars: &[&str]) -> Option<String> {
    config
        .api_key
        .clone()
        .into_iter()
        .chain(env_vars.iter().filter_map(|var| std::env::var(var).ok()))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
}

pub(crate) fn require_api_key<'a>(
    api_key: Option<&'a str>,
    env_var: &str,
) -> Result<&'a str, RecipeError> {
    api_key.ok_or_else(|| {
        RecipeError::Configuration(format!("{} not found in config or environment", env_var))
    })
}

/// The request URL is dropped from the message; it may carry credentials.
pub(crate) fn transport_error(provider: &str, err: reqwest::Error) -> RecipeError {
    let err = err.without_url();
    warn!("{} request failed: {}", provider, err);
    RecipeError::Provider(format!("{} request failed: {}", provider, err))
}

/// Read a provider response body, turning non-success statuses and embedded
/// error objects into `RecipeError::Provider` with the provider's own message.
pub(crate) async fn read_json_body(provider: &str, response: Response) -> Result<Value, RecipeError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))?;
    debug!("{} response ({}): {}", provider, status, body);

    let parsed: Option<Value> = serde_json::from_str(&body).ok();

    if let Some(message) = parsed.as_ref().and_then(error_message) {
        warn!("{} returned an error ({}): {}", provider, status, message);
        return Err(RecipeError::Provider(format!(
            "{} API error ({}): {}",
            provider,
            status.as_u16(),
            message
        )));
    }

    if !status.is_success() {
        return Err(RecipeError::Provider(format!(
            "{} API error ({}): {}",
            provider,
            status.as_u16(),
            body.trim()
        )));
    }

    parsed.ok_or_else(|| {
        RecipeError::Provider(format!("{} returned a non-JSON response: {}", provider, body))
    })
}

/// Pull the human readable message out of `{"error": ...}` envelopes
fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Object(error) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(Value::Object(error.clone()).to_string())),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
