use std::time::Duration;

use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::finder::RecipeFinder;
use crate::generate::RecipeGenerator;
use crate::providers::{self, ProviderFactory};
use crate::sources::{GeneratedSource, LocalDataset, MealDbSource};

/// LLM provider selection for the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Google,
    OpenAI,
    Anthropic,
}

impl Provider {
    /// Convert to provider name string used by the factory
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
        }
    }
}

/// Builder for configuring a `RecipeFinder`
#[derive(Default)]
pub struct RecipeFinderBuilder {
    config: Option<AppConfig>,
    provider: Option<Provider>,
    llm: Option<Box<dyn providers::LlmProvider>>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
    remote_base_url: Option<String>,
    without_remote: bool,
    without_generation: bool,
    local: Option<LocalDataset>,
}

impl RecipeFinderBuilder {
    /// Use an explicit configuration instead of loading `config.toml` and the
    /// environment
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the LLM provider used for generation
    ///
    /// # Example
    /// ```
    /// use recipe_finder::{Provider, RecipeFinder};
    ///
    /// let builder = RecipeFinder::builder().provider(Provider::OpenAI);
    /// ```
    pub fn provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Use an already constructed provider, bypassing the factory
    pub fn llm(mut self, provider: Box<dyn providers::LlmProvider>) -> Self {
        self.llm = Some(provider);
        self
    }

    /// Set the API key for the LLM provider
    ///
    /// This allows passing the API key directly instead of relying on
    /// environment variables or config files.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the LLM provider
    ///
    /// # Example
    /// ```
    /// use recipe_finder::{Provider, RecipeFinder};
    ///
    /// let builder = RecipeFinder::builder()
    ///     .provider(Provider::Google)
    ///     .model("gemini-1.5-pro");
    /// ```
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the timeout applied to each external call
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Point the remote lookup at another TheMealDB-compatible endpoint
    pub fn remote_base_url(mut self, url: impl Into<String>) -> Self {
        self.remote_base_url = Some(url.into());
        self
    }

    /// Disable the remote recipe database
    pub fn without_remote(mut self) -> Self {
        self.without_remote = true;
        self
    }

    /// Disable the generative fallback
    pub fn without_generation(mut self) -> Self {
        self.without_generation = true;
        self
    }

    /// Replace the built-in local dataset
    pub fn local_dataset(mut self, dataset: LocalDataset) -> Self {
        self.local = Some(dataset);
        self
    }

    /// Build the finder
    ///
    /// # Errors
    /// Returns `RecipeError` if:
    /// - the configuration cannot be loaded
    /// - the selected provider is unknown
    /// - the HTTP client for the remote source cannot be created
    ///
    /// A missing API key is not an error here; it is reported when a recipe
    /// has to be generated.
    pub fn build(self) -> Result<RecipeFinder, RecipeError> {
        let mut config = match self.config {
            Some(config) => config,
            None => AppConfig::load()?,
        };

        if let Some(provider) = self.provider {
            config.default_provider = provider.as_str().to_string();
        }

        if self.api_key.is_some() || self.model.is_some() {
            let mut provider_config = config.default_provider_config().ok_or_else(|| {
                RecipeError::Configuration(format!(
                    "Unknown provider: {}",
                    config.default_provider
                ))
            })?;
            if let Some(api_key) = self.api_key {
                provider_config.api_key = Some(api_key);
            }
            if let Some(model) = self.model {
                provider_config.model = model;
            }
            config
                .providers
                .insert(config.default_provider.clone(), provider_config);
        }

        if let Some(url) = self.remote_base_url {
            config.remote.base_url = url;
        }
        if self.without_remote {
            config.remote.enabled = false;
        }
        if self.without_generation {
            config.generation.enabled = false;
        }

        let timeout = self.timeout.unwrap_or_else(|| config.timeout());

        let generated = if config.generation.enabled {
            let provider = match self.llm {
                Some(provider) => provider,
                None => ProviderFactory::get_default_provider(&config)?,
            };
            let generator = RecipeGenerator::new(provider)
                .with_timeout(timeout)
                .with_image_url_template(config.generation.image_url_template.clone());
            Some(GeneratedSource::new(generator))
        } else {
            None
        };

        let remote = if config.remote.enabled {
            Some(MealDbSource::from_config(&config.remote, timeout)?)
        } else {
            None
        };

        Ok(RecipeFinder::new(
            self.local.unwrap_or_default(),
            remote,
            generated,
            config.remote.browse_term,
        ))
    }
}
