use crate::error::RecipeError;
use crate::generate::RecipeGenerator;
use crate::model::{Recipe, RecipeId};
use crate::sources::RecipeSource;
use async_trait::async_trait;

/// Exposes the recipe generator through the `RecipeSource` interface.
///
/// A term lookup generates exactly one recipe. An id lookup regenerates from
/// the dish name carried by a generated id and keeps that id; stable ids are
/// never known here.
pub struct GeneratedSource {
    generator: RecipeGenerator,
}

impl GeneratedSource {
    pub fn new(generator: RecipeGenerator) -> Self {
        GeneratedSource { generator }
    }

    pub fn generator(&self) -> &RecipeGenerator {
        &self.generator
    }
}

#[async_trait]
impl RecipeSource for GeneratedSource {
    fn source_name(&self) -> &str {
        "generated"
    }

    async fn lookup_by_term(&self, term: &str) -> Result<Vec<Recipe>, RecipeError> {
        Ok(vec![self.generator.resolve(term).await?])
    }

    async fn lookup_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeError> {
        match id {
            RecipeId::Generated { name, .. } => {
                let mut recipe = self.generator.resolve(name).await?;
                // Keep the id the caller linked to
                recipe.id = id.clone();
                Ok(Some(recipe))
            }
            RecipeId::Stable(_) => Ok(None),
        }
    }
}
