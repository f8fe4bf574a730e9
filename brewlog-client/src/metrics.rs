use brewlog_common::domain::{Ingredient, RecipeMetrics};

/// Inputs the backfill hands to the external calculator.
#[derive(Debug)]
pub struct MetricsInput<'a> {
    pub batch_size: f64,
    pub batch_size_unit: &'a str,
    pub efficiency: Option<f64>,
    pub ingredients: &'a [Ingredient],
}

/// Seam for the external brewing-metrics calculator. The engine only
/// schedules the backfill; the math lives with the caller.
pub trait MetricsCalculator {
    fn compute(&self, input: MetricsInput<'_>) -> RecipeMetrics;
}
