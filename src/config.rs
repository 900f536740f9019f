use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used for recipe generation
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Timeout in seconds for a single external call
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Remote recipe database settings
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Generative fallback settings
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Configuration for a specific LLM provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Model identifier (e.g., "gemini-1.5-flash", "gpt-4o-mini")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
    /// Ask the provider for JSON-only output where it supports it
    #[serde(default = "default_json_mode")]
    pub json_mode: bool,
}

impl ProviderConfig {
    /// Provider settings with the given model and every other field defaulted
    pub fn with_model(model: impl Into<String>) -> Self {
        ProviderConfig {
            model: model.into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
            json_mode: default_json_mode(),
        }
    }
}

/// Configuration for the remote recipe database
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_enabled")]
    pub enabled: bool,
    /// Base URL of TheMealDB-compatible API, without trailing slash
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,
    /// Term used when browsing with an empty search
    #[serde(default = "default_browse_term")]
    pub browse_term: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: default_remote_enabled(),
            base_url: default_remote_base_url(),
            browse_term: default_browse_term(),
        }
    }
}

/// Configuration for the generative fallback
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_generation_enabled")]
    pub enabled: bool,
    /// Image URL for generated recipes; `{dish}` is replaced by the dish name
    #[serde(default = "default_image_url_template")]
    pub image_url_template: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: default_generation_enabled(),
            image_url_template: default_image_url_template(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "google".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_json_mode() -> bool {
    true
}

fn default_timeout() -> u64 {
    30
}

fn default_remote_enabled() -> bool {
    true
}

fn default_remote_base_url() -> String {
    "https://www.themealdb.com/api/json/v1/1".to_string()
}

fn default_browse_term() -> String {
    "chicken".to_string()
}

fn default_generation_enabled() -> bool {
    true
}

fn default_image_url_template() -> String {
    "https://source.unsplash.com/800x600/?{dish},food".to_string()
}

/// Model used when a provider has no explicit configuration entry
pub fn default_model_for(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "google" => Some("gemini-1.5-flash"),
        "openai" => Some("gpt-4o-mini"),
        "anthropic" => Some("claude-3-5-haiku-latest"),
        _ => None,
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            timeout: default_timeout(),
            remote: RemoteConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_FINDER__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_FINDER__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Settings for the default provider, synthesised from defaults when absent
    pub fn default_provider_config(&self) -> Option<ProviderConfig> {
        self.providers
            .get(&self.default_provider)
            .cloned()
            .or_else(|| default_model_for(&self.default_provider).map(ProviderConfig::with_model))
    }
}

/// Load configuration from file and environment variables
///
/// Environment variable format: RECIPE_FINDER__PROVIDERS__GOOGLE__API_KEY
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_FINDER__PROVIDERS__GOOGLE__API_KEY
        .add_source(
            Environment::with_prefix("RECIPE_FINDER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
