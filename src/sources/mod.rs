mod generated;
mod local;
mod remote;

pub use generated::GeneratedSource;
pub use local::LocalDataset;
pub use remote::{meal_to_recipe, MealDbSource, MAX_INGREDIENT_SLOTS};

use crate::error::RecipeError;
use crate::model::{Recipe, RecipeId};
use async_trait::async_trait;

/// Common interface over the places a recipe can come from
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Get the source name (e.g., "local", "themealdb")
    fn source_name(&self) -> &str;

    /// Recipes matching a free-text term, in the source's own order
    async fn lookup_by_term(&self, term: &str) -> Result<Vec<Recipe>, RecipeError>;

    /// The recipe with the given identifier, if this source knows it
    async fn lookup_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeError>;
}
