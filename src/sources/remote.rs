use crate::config::RemoteConfig;
use crate::error::RecipeError;
use crate::model::{Ingredient, Recipe, RecipeId};
use crate::sources::RecipeSource;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;

/// TheMealDB exposes ingredients as `strIngredient1..20` / `strMeasure1..20`
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// Response envelope shared by `search.php` and `lookup.php`
#[derive(Debug, Deserialize)]
struct MealsEnvelope {
    #[serde(default)]
    meals: Option<Vec<Map<String, Value>>>,
}

fn text_field<'a>(meal: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    meal.get(key).and_then(Value::as_str)
}

/// Reshape one flat TheMealDB meal object into a recipe.
///
/// An ingredient slot is kept only when its name is non-blank; its measure
/// is carried through even when blank. Meals without an id or name are
/// rejected.
pub fn meal_to_recipe(meal: &Map<String, Value>) -> Option<Recipe> {
    let id = text_field(meal, "idMeal")
        .map(str::trim)
        .filter(|id| !id.is_empty())?;
    let name = text_field(meal, "strMeal")
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    let ingredients = (1..=MAX_INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let ingredient = text_field(meal, &format!("strIngredient{}", slot))?.trim();
            if ingredient.is_empty() {
                return None;
            }
            let measure = text_field(meal, &format!("strMeasure{}", slot)).unwrap_or_default();
            Some(Ingredient::new(ingredient, measure))
        })
        .collect();

    let instructions = text_field(meal, "strInstructions")
        .unwrap_or_default()
        .replace("\r\n", "\n");

    Some(Recipe {
        id: RecipeId::stable(id),
        name: name.to_string(),
        image: text_field(meal, "strMealThumb").unwrap_or_default().to_string(),
        category: text_field(meal, "strCategory").unwrap_or_default().to_string(),
        area: text_field(meal, "strArea").unwrap_or_default().to_string(),
        ingredients,
        instructions,
    })
}

/// Read-only adapter over TheMealDB's public JSON API
pub struct MealDbSource {
    client: Client,
    base_url: String,
}

impl MealDbSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RecipeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RecipeError::Remote(format!("Failed to create HTTP client: {}", e)))?;

        Ok(MealDbSource {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &RemoteConfig, timeout: Duration) -> Result<Self, RecipeError> {
        Self::new(config.base_url.clone(), timeout)
    }

    async fn fetch_meals(
        &self,
        endpoint: &str,
        query: (&str, &str),
    ) -> Result<Vec<Recipe>, RecipeError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Querying {} with {}={}", url, query.0, query.1);

        let response = self
            .client
            .get(&url)
            .query(&[query])
            .send()
            .await
            .map_err(|e| RecipeError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            warn!("{} answered with status {}", url, response.status());
            return Err(RecipeError::Remote(format!(
                "{} answered with status {}",
                url,
                response.status()
            )));
        }

        let envelope: MealsEnvelope = response
            .json()
            .await
            .map_err(|e| RecipeError::Remote(format!("Invalid response from {}: {}", url, e)))?;

        let recipes: Vec<Recipe> = envelope
            .meals
            .unwrap_or_default()
            .iter()
            .filter_map(meal_to_recipe)
            .collect();
        info!("{} returned {} meal(s)", url, recipes.len());

        Ok(recipes)
    }
}

#[async_trait]
impl RecipeSource for MealDbSource {
    fn source_name(&self) -> &str {
        "themealdb"
    }

    async fn lookup_by_term(&self, term: &str) -> Result<Vec<Recipe>, RecipeError> {
        self.fetch_meals("search.php", ("s", term.trim())).await
    }

    async fn lookup_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeError> {
        let RecipeId::Stable(id) = id else {
            return Ok(None);
        };
        let meals = self.fetch_meals("lookup.php", ("i", id.as_str())).await?;
        Ok(meals.into_iter().next())
    }
}
