use crate::domain::{Ingredient, Recipe, RecipeMetrics};

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// Body for both create and update. The server owns `id`, `created_at` and
/// `updated_at`, so the payload never carries them.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct SaveRecipeRequest {
    pub user_id: String,
    pub name: String,
    pub style: Option<String>,
    pub batch_size: f64,
    pub batch_size_unit: String,
    pub boil_time: Option<u32>,
    pub efficiency: Option<f64>,
    pub ingredients: Vec<Ingredient>,
    pub notes: Option<String>,
    pub metrics: RecipeMetrics,
}

impl From<&Recipe> for SaveRecipeRequest {
    fn from(recipe: &Recipe) -> Self {
        Self {
            user_id: recipe.user_id.clone(),
            name: recipe.name.clone(),
            style: recipe.style.clone(),
            batch_size: recipe.batch_size,
            batch_size_unit: recipe.batch_size_unit.clone(),
            boil_time: recipe.boil_time,
            efficiency: recipe.efficiency,
            ingredients: recipe.ingredients.clone(),
            notes: recipe.notes.clone(),
            metrics: recipe.metrics.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorMessage {
    pub value: String,
}
