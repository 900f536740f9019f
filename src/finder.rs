use crate::builder::RecipeFinderBuilder;
use crate::config::AppConfig;
use crate::error::RecipeError;
use crate::model::{Recipe, RecipeId};
use crate::sources::{GeneratedSource, LocalDataset, MealDbSource, RecipeSource};
use log::{info, warn};
use serde::Serialize;

/// Result shape handed to whatever renders recipes:
/// `{"success": true, "data": ...}` or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Success { success: bool, data: T },
    Failure { error: String },
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse::Success {
            success: true,
            data,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }
}

impl<T> From<Result<T, RecipeError>> for ApiResponse<T> {
    fn from(result: Result<T, RecipeError>) -> Self {
        match result {
            Ok(data) => ApiResponse::success(data),
            Err(err) => {
                warn!("Request failed: {}", err);
                ApiResponse::Failure {
                    error: err.user_message(),
                }
            }
        }
    }
}

/// Resolves dish searches and recipe detail requests across the local
/// dataset, TheMealDB and the recipe generator.
///
/// Flows never chain into each other: a search that misses locally goes to
/// the generator, a detail request for a stable id goes to the local table
/// and then TheMealDB, and browsing only queries TheMealDB.
pub struct RecipeFinder {
    local: LocalDataset,
    remote: Option<MealDbSource>,
    generated: Option<GeneratedSource>,
    browse_term: String,
}

impl RecipeFinder {
    /// Creates a new builder for configuring a finder
    pub fn builder() -> RecipeFinderBuilder {
        RecipeFinderBuilder::default()
    }

    pub fn new(
        local: LocalDataset,
        remote: Option<MealDbSource>,
        generated: Option<GeneratedSource>,
        browse_term: impl Into<String>,
    ) -> Self {
        RecipeFinder {
            local,
            remote,
            generated,
            browse_term: browse_term.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, RecipeError> {
        Self::builder().config(config.clone()).build()
    }

    pub fn local(&self) -> &LocalDataset {
        &self.local
    }

    pub fn generation_enabled(&self) -> bool {
        self.generated.is_some()
    }

    /// Search flow: local matches in dataset order, otherwise one generated recipe.
    pub async fn search(&self, term: &str) -> Result<Vec<Recipe>, RecipeError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(RecipeError::NotFound("search term is empty".to_string()));
        }

        let hits = self.local.lookup_by_term(term).await?;
        if !hits.is_empty() {
            info!("'{}' matched {} local recipe(s)", term, hits.len());
            return Ok(hits);
        }

        match &self.generated {
            Some(generated) => {
                info!("No local match for '{}', generating", term);
                generated.lookup_by_term(term).await
            }
            None => Err(RecipeError::NotFound(format!(
                "no recipe matches '{}'",
                term
            ))),
        }
    }

    /// Detail flow for an id taken from a previous result.
    ///
    /// Generated ids cannot be looked up, so `name_hint` must carry the dish
    /// name to regenerate it. The regenerated recipe keeps the requested id.
    /// Stable ids are tried locally, then remotely.
    pub async fn detail(&self, id: &str, name_hint: Option<&str>) -> Result<Recipe, RecipeError> {
        if RecipeId::is_generated_tag(id) {
            let recipe_id = RecipeId::parse(id, name_hint).ok_or_else(|| {
                RecipeError::NotFound(format!(
                    "generated recipe {} was not stored: malformed id or no dish name given",
                    id.trim()
                ))
            })?;
            let generated = self.generated.as_ref().ok_or_else(|| {
                RecipeError::NotFound(format!(
                    "generated recipe {} cannot be recreated: generation is disabled",
                    id.trim()
                ))
            })?;
            info!("Regenerating {} from its dish name", id.trim());
            return generated
                .lookup_by_id(&recipe_id)
                .await?
                .ok_or_else(|| RecipeError::NotFound(id.trim().to_string()));
        }

        let recipe_id = RecipeId::parse(id, None)
            .ok_or_else(|| RecipeError::NotFound("recipe id is empty".to_string()))?;

        if let Some(recipe) = self.local.lookup_by_id(&recipe_id).await? {
            return Ok(recipe);
        }

        if let Some(remote) = &self.remote {
            if let Some(recipe) = remote.lookup_by_id(&recipe_id).await? {
                return Ok(recipe);
            }
        }

        Err(RecipeError::NotFound(format!("no recipe with id {}", recipe_id)))
    }

    /// Browse flow: free-text search against TheMealDB only.
    ///
    /// An empty term browses the configured default term. A disabled remote
    /// source yields an empty list.
    pub async fn browse(&self, term: &str) -> Result<Vec<Recipe>, RecipeError> {
        let Some(remote) = &self.remote else {
            return Ok(Vec::new());
        };

        let term = match term.trim() {
            "" => self.browse_term.as_str(),
            term => term,
        };
        remote.lookup_by_term(term).await
    }
}
