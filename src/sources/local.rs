use crate::error::RecipeError;
use crate::model::{Ingredient, Recipe, RecipeId};
use crate::sources::RecipeSource;
use async_trait::async_trait;

const COLA_WINGS_IMAGE: &str = "https://www.themealdb.com/images/media/meals/usywpp1511189717.jpg";

/// Fixed, pre-seeded table of curated recipes.
///
/// Matching is a case-insensitive substring search over name and category;
/// results keep table order.
#[derive(Debug, Clone)]
pub struct LocalDataset {
    recipes: Vec<Recipe>,
}

impl LocalDataset {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        LocalDataset { recipes }
    }

    /// The built-in dataset
    pub fn seeded() -> Self {
        Self::new(vec![
            Recipe {
                id: RecipeId::stable("1"),
                name: "秘制可乐鸡翅".to_string(),
                image: COLA_WINGS_IMAGE.to_string(),
                category: "家常菜".to_string(),
                area: "中国".to_string(),
                ingredients: vec![
                    Ingredient::new("鸡翅中", "10个"),
                    Ingredient::new("可口可乐", "1罐"),
                    Ingredient::new("姜", "3片"),
                    Ingredient::new("料酒", "1勺"),
                    Ingredient::new("生抽", "2勺"),
                ],
                instructions: "1. 鸡翅洗净划两刀。\n2. 冷水下锅焯水。\n3. 煎至两面金黄。\n4. 倒入可乐和调料。\n5. 小火慢炖20分钟，大火收汁。".to_string(),
            },
            Recipe {
                id: RecipeId::stable("2"),
                name: "西红柿炒鸡蛋".to_string(),
                image: "https://www.themealdb.com/images/media/meals/1529446137.jpg".to_string(),
                category: "家常菜".to_string(),
                area: "中国".to_string(),
                ingredients: vec![
                    Ingredient::new("鸡蛋", "3个"),
                    Ingredient::new("西红柿", "2个"),
                ],
                instructions: "1. 鸡蛋炒熟盛出。\n2. 炒西红柿出汁。\n3. 倒入鸡蛋混合，加盐出锅。".to_string(),
            },
            Recipe {
                id: RecipeId::stable("mock-coke-wings"),
                name: "秘制可乐鸡翅 (Cola Chicken Wings)".to_string(),
                image: COLA_WINGS_IMAGE.to_string(),
                category: "中餐".to_string(),
                area: "China".to_string(),
                ingredients: vec![
                    Ingredient::new("鸡翅", "8个"),
                    Ingredient::new("可乐", "1罐"),
                    Ingredient::new("姜片", "3片"),
                    Ingredient::new("酱油", "2勺"),
                ],
                instructions: "1. 鸡翅洗净划两刀。\n2. 冷水下锅焯水，捞出沥干。\n3. 锅中放油，煎至两面金黄。\n4. 加入葱姜蒜，倒入一罐可乐。\n5. 小火慢炖20分钟，大火收汁即可。".to_string(),
            },
        ])
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn search(&self, term: &str) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|recipe| recipe.matches_term(term))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &RecipeId) -> Option<Recipe> {
        self.recipes.iter().find(|recipe| &recipe.id == id).cloned()
    }
}

impl Default for LocalDataset {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl RecipeSource for LocalDataset {
    fn source_name(&self) -> &str {
        "local"
    }

    async fn lookup_by_term(&self, term: &str) -> Result<Vec<Recipe>, RecipeError> {
        Ok(self.search(term))
    }

    async fn lookup_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, RecipeError> {
        Ok(self.get(id))
    }
}
