use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix marking identifiers of generated, never-persisted recipes
pub const GENERATED_ID_PREFIX: &str = "ai-";

/// Identifier of a recipe.
///
/// Curated and remote recipes carry a stable identifier. Generated recipes carry
/// the dish name they were generated from and the moment of generation: the id
/// alone cannot be used to fetch them again, the name has to be resubmitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipeId {
    Stable(String),
    Generated { name: String, timestamp: u128 },
}

impl RecipeId {
    pub fn stable(id: impl Into<String>) -> Self {
        RecipeId::Stable(id.into())
    }

    /// Tag a freshly generated recipe for `name` with the current time
    pub fn generated(name: impl Into<String>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        RecipeId::Generated {
            name: name.into(),
            timestamp,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, RecipeId::Generated { .. })
    }

    /// Interpret an identifier received from a caller.
    ///
    /// Returns `None` for a generated-namespace id when no dish name was
    /// supplied alongside it, since nothing else can be recovered from it,
    /// or when its timestamp is not a number.
    pub fn parse(raw: &str, name_hint: Option<&str>) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        match raw.strip_prefix(GENERATED_ID_PREFIX) {
            Some(rest) => {
                let name = name_hint.map(str::trim).filter(|n| !n.is_empty())?;
                Some(RecipeId::Generated {
                    name: name.to_string(),
                    timestamp: rest.parse().ok()?,
                })
            }
            None => Some(RecipeId::Stable(raw.to_string())),
        }
    }

    /// Whether a raw caller-supplied id lives in the generated namespace
    pub fn is_generated_tag(raw: &str) -> bool {
        raw.trim().starts_with(GENERATED_ID_PREFIX)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeId::Stable(id) => write!(f, "{}", id),
            RecipeId::Generated { timestamp, .. } => {
                write!(f, "{}{}", GENERATED_ID_PREFIX, timestamp)
            }
        }
    }
}

impl Serialize for RecipeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub measure: String,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, measure: impl Into<String>) -> Self {
        Ingredient {
            name: name.into(),
            measure: measure.into(),
        }
    }
}

/// Canonical recipe record shared by every source.
///
/// `ingredients` keeps display order; an empty list on a generated record
/// means the model judged the dish not to be real or edible.
/// `instructions` holds one step per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub category: String,
    pub area: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
}

impl Recipe {
    pub fn is_generated(&self) -> bool {
        self.id.is_generated()
    }

    /// Instruction steps, one per non-blank line
    pub fn steps(&self) -> Vec<&str> {
        self.instructions
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Case-insensitive substring match against name and category
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&term) || self.category.to_lowercase().contains(&term)
    }
}
