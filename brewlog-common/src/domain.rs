use std::cmp::PartialOrd;
use std::convert::From;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientKind {
    Fermentable,
    Hop,
    Yeast,
    Other,
}

impl FromStr for IngredientKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fermentable" => Ok(Self::Fermentable),
            "hop" => Ok(Self::Hop),
            "yeast" => Ok(Self::Yeast),
            _ => Ok(Self::Other),
        }
    }
}

impl IngredientKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngredientKind::Fermentable => "fermentable",
            IngredientKind::Hop => "hop",
            IngredientKind::Yeast => "yeast",
            IngredientKind::Other => "other",
        }
    }
}

impl std::fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Ingredient {
    /// Client-generated id. Must be non-empty before the owning recipe can
    /// be uploaded.
    pub id: String,
    pub name: String,
    pub kind: IngredientKind,
    pub amount: f64,
    pub unit: String,
    /// Free-form timing note ("60 min", "dry hop day 3").
    pub timing: Option<String>,
}

impl Ingredient {
    pub fn new(name: String, kind: IngredientKind, amount: f64, unit: String) -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            name,
            kind,
            amount,
            unit,
            timing: None,
        }
    }
}

/// Estimated brewing metrics. All fields are optional because a recipe can
/// exist before the calculator ran over it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecipeMetrics {
    pub estimated_og: Option<f64>,
    pub estimated_fg: Option<f64>,
    pub estimated_abv: Option<f64>,
    pub estimated_ibu: Option<f64>,
    pub estimated_srm: Option<f64>,
}

impl RecipeMetrics {
    /// True when no metric has been estimated yet.
    pub fn is_empty(&self) -> bool {
        self.estimated_og.is_none()
            && self.estimated_fg.is_none()
            && self.estimated_abv.is_none()
            && self.estimated_ibu.is_none()
            && self.estimated_srm.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recipe {
    /// Server-assigned id. Empty until the first successful remote create
    /// confirms the recipe; the offline envelope carries the temp id in the
    /// meantime.
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub style: Option<String>,
    pub batch_size: f64,
    pub batch_size_unit: String,
    pub boil_time: Option<u32>,
    pub efficiency: Option<f64>,
    pub ingredients: Vec<Ingredient>,
    pub notes: Option<String>,
    #[serde(default)]
    pub metrics: RecipeMetrics,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Recipe {
    /// Every ingredient needs an id before the recipe can go over the wire.
    pub fn has_syncable_ingredients(&self) -> bool {
        self.ingredients.iter().all(|x| !x.id.trim().is_empty())
    }
}

/// User input for a new recipe. Identity and ownership get attached by the
/// engine, not the caller.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RecipeDraft {
    pub name: String,
    pub style: Option<String>,
    pub batch_size: f64,
    pub batch_size_unit: String,
    pub boil_time: Option<u32>,
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    pub notes: Option<String>,
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub style: Option<String>,
    pub batch_size: Option<f64>,
    pub batch_size_unit: Option<String>,
    pub boil_time: Option<u32>,
    pub efficiency: Option<f64>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub notes: Option<String>,
}

impl RecipePatch {
    pub fn apply(&self, recipe: &mut Recipe) {
        if let Some(v) = &self.name {
            recipe.name = v.clone();
        }
        if let Some(v) = &self.style {
            recipe.style = Some(v.clone());
        }
        if let Some(v) = self.batch_size {
            recipe.batch_size = v;
        }
        if let Some(v) = &self.batch_size_unit {
            recipe.batch_size_unit = v.clone();
        }
        if let Some(v) = self.boil_time {
            recipe.boil_time = Some(v);
        }
        if let Some(v) = self.efficiency {
            recipe.efficiency = Some(v);
        }
        if let Some(v) = &self.ingredients {
            recipe.ingredients = v.clone();
        }
        if let Some(v) = &self.notes {
            recipe.notes = Some(v.clone());
        }
    }
}

/// Version of the persisted offline aggregate. Bumped on every save so a
/// partially written state is detectable across the three storage keys.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StateVersion(u32);

impl StateVersion {
    pub fn new() -> Self {
        Self(1)
    }

    pub fn inner(&self) -> u32 {
        self.0
    }

    pub fn bump(&mut self) {
        self.0 += 1;
    }
}

impl Default for StateVersion {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialOrd for StateVersion {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl From<u32> for StateVersion {
    fn from(value: u32) -> Self {
        Self(value)
    }
}
