pub mod builder;
pub mod config;
pub mod error;
pub mod finder;
pub mod generate;
pub mod model;
pub mod providers;
pub mod sources;

pub use builder::{Provider, RecipeFinderBuilder};
pub use config::AppConfig;
pub use error::RecipeError;
pub use finder::{ApiResponse, RecipeFinder};
pub use generate::RecipeGenerator;
pub use model::{Ingredient, Recipe, RecipeId};
pub use sources::{LocalDataset, RecipeSource};

/// Generate a recipe for `dish_name` with the configured provider.
///
/// Loads `config.toml` and the environment, then makes a single model
/// request. Failures are folded into the returned response.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() {
/// let response = recipe_finder::generate_recipe("麻婆豆腐").await;
/// println!("{}", serde_json::to_string_pretty(&response).unwrap());
/// # }
/// ```
pub async fn generate_recipe(dish_name: &str) -> ApiResponse<Recipe> {
    try_generate_recipe(dish_name).await.into()
}

async fn try_generate_recipe(dish_name: &str) -> Result<Recipe, RecipeError> {
    let config = AppConfig::load()?;
    RecipeGenerator::from_config(&config)?
        .resolve(dish_name)
        .await
}

/// Search the local dataset, generating a recipe when nothing matches.
pub async fn search_recipes(term: &str) -> ApiResponse<Vec<Recipe>> {
    try_search_recipes(term).await.into()
}

async fn try_search_recipes(term: &str) -> Result<Vec<Recipe>, RecipeError> {
    let finder = RecipeFinder::builder().build()?;
    finder.search(term).await
}
