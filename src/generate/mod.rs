pub mod extract;

pub use extract::{extract_json_object, strip_code_fence};

use crate::config::{AppConfig, GenerationConfig};
use crate::error::RecipeError;
use crate::model::{Ingredient, Recipe, RecipeId};
use crate::providers::prompt::image_url_for;
use crate::providers::{build_recipe_prompt, LlmProvider, ProviderFactory};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Category stamped on every generated recipe
pub const GENERATED_CATEGORY: &str = "AI推荐";
/// Area stamped on every generated recipe
pub const GENERATED_AREA: &str = "智能生成";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Recipe as the model is asked to return it. Only the content fields are
/// trusted; provenance fields are replaced after parsing.
#[derive(Debug, Deserialize)]
struct GeneratedRecipe {
    ingredients: Vec<GeneratedIngredient>,
    #[serde(default)]
    instructions: Option<GeneratedInstructions>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedIngredient {
    Pair {
        name: String,
        #[serde(default)]
        measure: Value,
    },
    Plain(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedInstructions {
    Text(String),
    Steps(Vec<String>),
}

impl GeneratedIngredient {
    fn into_ingredient(self) -> Option<Ingredient> {
        let (name, measure) = match self {
            GeneratedIngredient::Pair { name, measure } => {
                let measure = match measure {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (name, measure)
            }
            GeneratedIngredient::Plain(name) => (name, String::new()),
        };

        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Ingredient::new(name, measure.trim()))
    }
}

impl GeneratedInstructions {
    fn into_text(self) -> String {
        match self {
            GeneratedInstructions::Text(text) => text.trim().to_string(),
            GeneratedInstructions::Steps(steps) => steps
                .iter()
                .map(|step| step.trim())
                .filter(|step| !step.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Turn a raw model completion into a recipe for `dish_name`.
///
/// The record always gets a fresh generated id, the queried name, the
/// configured image and the generated category/area, whatever the model
/// put in those fields.
pub fn parse_completion(raw: &str, dish_name: &str, image_url: &str) -> Result<Recipe, RecipeError> {
    let malformed = |reason: String| {
        warn!("Malformed model output for '{}': {}", dish_name, reason);
        debug!("Raw model output: {}", raw);
        RecipeError::MalformedOutput {
            reason,
            raw: raw.to_string(),
        }
    };

    let json = extract_json_object(raw)
        .ok_or_else(|| malformed("no JSON object found in model output".to_string()))?;

    let generated: GeneratedRecipe = serde_json::from_str(json)
        .map_err(|e| malformed(format!("model output does not match the recipe schema: {}", e)))?;

    let dish_name = dish_name.trim();
    Ok(Recipe {
        id: RecipeId::generated(dish_name),
        name: dish_name.to_string(),
        image: image_url.to_string(),
        category: GENERATED_CATEGORY.to_string(),
        area: GENERATED_AREA.to_string(),
        ingredients: generated
            .ingredients
            .into_iter()
            .filter_map(GeneratedIngredient::into_ingredient)
            .collect(),
        instructions: generated
            .instructions
            .map(GeneratedInstructions::into_text)
            .unwrap_or_default(),
    })
}

/// Generates recipes for dishes no other source knows about.
///
/// Each call makes at most one request to the model, bounded by the
/// configured timeout. Nothing is cached between calls.
pub struct RecipeGenerator {
    provider: Box<dyn LlmProvider>,
    timeout: Duration,
    image_url_template: String,
}

impl RecipeGenerator {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        RecipeGenerator {
            provider,
            timeout: DEFAULT_TIMEOUT,
            image_url_template: GenerationConfig::default().image_url_template,
        }
    }

    /// Build a generator for the configured default provider
    pub fn from_config(config: &AppConfig) -> Result<Self, RecipeError> {
        let provider = ProviderFactory::get_default_provider(config)?;
        Ok(Self::new(provider)
            .with_timeout(config.timeout())
            .with_image_url_template(config.generation.image_url_template.clone()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_image_url_template(mut self, template: impl Into<String>) -> Self {
        self.image_url_template = template.into();
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Generate a recipe for `dish_name`.
    ///
    /// # Errors
    /// - `Configuration` if the provider has no credential (no request is made)
    /// - `Provider` if the request fails, is rejected or times out
    /// - `MalformedOutput` if the completion cannot be parsed into a recipe
    pub async fn resolve(&self, dish_name: &str) -> Result<Recipe, RecipeError> {
        let dish_name = dish_name.trim();
        if dish_name.is_empty() {
            return Err(RecipeError::NotFound("empty dish name".to_string()));
        }

        self.provider.ensure_configured()?;

        let image_url = image_url_for(&self.image_url_template, dish_name);
        let prompt = build_recipe_prompt(dish_name, &image_url);
        debug!("Generation prompt for '{}': {}", dish_name, prompt);

        info!(
            "Generating recipe for '{}' with {} ({})",
            dish_name,
            self.provider.provider_name(),
            self.provider.model()
        );
        let raw = tokio::time::timeout(self.timeout, self.provider.complete(&prompt))
            .await
            .map_err(|_| {
                warn!(
                    "{} did not answer within {:?}",
                    self.provider.provider_name(),
                    self.timeout
                );
                RecipeError::Provider(format!(
                    "{} did not answer within {} seconds",
                    self.provider.provider_name(),
                    self.timeout.as_secs_f32()
                ))
            })??;

        parse_completion(&raw, dish_name, &image_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "https://img.example/dish";

    #[test]
    fn test_parse_overwrites_provenance_fields() {
        let raw = r#"{
            "id": "1",
            "name": "Something else",
            "image": "https://evil.example/x.jpg",
            "category": "Dessert",
            "area": "Mars",
            "ingredients": [{"name": "鸡蛋", "measure": "3个"}],
            "instructions": "1. 打蛋。\n2. 下锅。"
        }"#;

        let recipe = parse_completion(raw, " 番茄炒蛋 ", IMAGE).unwrap();
        assert!(recipe.is_generated());
        assert!(recipe.id.to_string().starts_with("ai-"));
        assert_eq!(recipe.name, "番茄炒蛋");
        assert_eq!(recipe.image, IMAGE);
        assert_eq!(recipe.category, GENERATED_CATEGORY);
        assert_eq!(recipe.area, GENERATED_AREA);
        assert_eq!(recipe.ingredients, vec![Ingredient::new("鸡蛋", "3个")]);
        assert_eq!(recipe.steps().len(), 2);
    }

    #[test]
    fn test_empty_ingredients_signal_is_preserved() {
        let raw = r#"{"name": "奥特曼炒蛋", "ingredients": [], "instructions": "这不是一道真实的菜。"}"#;
        let recipe = parse_completion(raw, "奥特曼炒蛋", IMAGE).unwrap();
        assert!(recipe.ingredients.is_empty());
        assert_eq!(recipe.instructions, "这不是一道真实的菜。");
    }

    #[test]
    fn test_repairs_loose_shapes() {
        let raw = r#"{
            "ingredients": [
                {"name": "Eggs", "measure": 3},
                {"name": "Salt"},
                {"name": "Butter", "measure": null},
                {"name": "   ", "measure": "1"},
                "Chives"
            ],
            "instructions": ["Whisk.", "  ", "Cook gently."]
        }"#;

        let recipe = parse_completion(raw, "Scrambled Eggs", IMAGE).unwrap();
        assert_eq!(
            recipe.ingredients,
            vec![
                Ingredient::new("Eggs", "3"),
                Ingredient::new("Salt", ""),
                Ingredient::new("Butter", ""),
                Ingredient::new("Chives", ""),
            ]
        );
        assert_eq!(recipe.instructions, "Whisk.\nCook gently.");
    }

    #[test]
    fn test_missing_instructions_become_empty() {
        let recipe = parse_completion(r#"{"ingredients": []}"#, "Water", IMAGE).unwrap();
        assert_eq!(recipe.instructions, "");

        let recipe =
            parse_completion(r#"{"ingredients": [], "instructions": null}"#, "Water", IMAGE)
                .unwrap();
        assert_eq!(recipe.instructions, "");
    }

    #[test]
    fn test_missing_ingredients_is_malformed() {
        let err = parse_completion(r#"{"name": "x", "instructions": "y"}"#, "x", IMAGE).unwrap_err();
        match err {
            RecipeError::MalformedOutput { reason, raw } => {
                assert!(reason.contains("schema"));
                assert!(raw.contains("instructions"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_tolerates_stray_fences_and_braces() {
        let trailing_fence = "{\"ingredients\": [{\"name\": \"豆腐\", \"measure\": \"1块\"}], \"instructions\": \"炖。\"}\n```";
        let recipe = parse_completion(trailing_fence, "麻婆豆腐", IMAGE).unwrap();
        assert_eq!(recipe.ingredients, vec![Ingredient::new("豆腐", "1块")]);

        let fence_in_prose =
            "{\"ingredients\": [], \"instructions\": \"炖。\"}\n\nTip: run ```enjoy``` later";
        let recipe = parse_completion(fence_in_prose, "麻婆豆腐", IMAGE).unwrap();
        assert_eq!(recipe.instructions, "炖。");

        let backticks = r#"{"ingredients": [], "instructions": "步骤 ```1``` 炖。"}"#;
        let recipe = parse_completion(backticks, "麻婆豆腐", IMAGE).unwrap();
        assert_eq!(recipe.instructions, "步骤 ```1``` 炖。");

        let braced_prefix = "The recipe for {麻婆豆腐}: {\"ingredients\": [\"豆腐\"]}";
        let recipe = parse_completion(braced_prefix, "麻婆豆腐", IMAGE).unwrap();
        assert_eq!(recipe.ingredients, vec![Ingredient::new("豆腐", "")]);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = parse_completion("I'm sorry, I can't help with that.", "x", IMAGE).unwrap_err();
        assert!(matches!(
            err,
            RecipeError::MalformedOutput { ref raw, .. } if raw == "I'm sorry, I can't help with that."
        ));
    }

    #[test]
    fn test_invalid_json_inside_braces_is_malformed() {
        let err = parse_completion("{name: 'x', ingredients: []}", "x", IMAGE).unwrap_err();
        assert!(matches!(err, RecipeError::MalformedOutput { .. }));
    }
}
