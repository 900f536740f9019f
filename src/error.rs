use thiserror::Error;

/// Generic message shown when the model output could not be turned into a recipe
pub const GENERATION_FAILED_MESSAGE: &str = "AI 暂时想不起来做法，请稍后再试。";

/// Errors that can occur while resolving a recipe
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Required credential or provider setting is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration file or environment could not be loaded
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// The model provider rejected the request or could not be reached
    #[error("Provider error: {0}")]
    Provider(String),

    /// The model answered, but not with a usable recipe
    #[error("Malformed model output: {reason}")]
    MalformedOutput {
        /// What went wrong while extracting or parsing
        reason: String,
        /// The untouched model completion
        raw: String,
    },

    /// No source produced a recipe
    #[error("Recipe not found: {0}")]
    NotFound(String),

    /// The remote recipe database failed
    #[error("Remote lookup failed: {0}")]
    Remote(String),
}

impl RecipeError {
    /// Message suitable for showing to the person who searched.
    ///
    /// Provider and configuration errors keep the underlying message so that
    /// credential or model-name drift stays diagnosable.
    pub fn user_message(&self) -> String {
        match self {
            RecipeError::MalformedOutput { .. } => GENERATION_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}
