use brewlog_client::metrics::{MetricsCalculator, MetricsInput};
use brewlog_client::service::OfflineRecipeService;
use brewlog_common::domain::{IngredientKind, RecipeMetrics};
use eyre::Result;

/// Rough homebrew estimates. Assumes gallons for batch size and pounds for
/// fermentables, ounces for hops; good enough for a glanceable number, not
/// for competition paperwork.
pub struct BrewCalc;

impl MetricsCalculator for BrewCalc {
    fn compute(&self, input: MetricsInput<'_>) -> RecipeMetrics {
        let efficiency = input.efficiency.unwrap_or(0.72);
        let batch = if input.batch_size > 0.0 {
            input.batch_size
        } else {
            5.0
        };

        let mut gravity_points = 0.0;
        let mut ibu = 0.0;
        let mut mcu = 0.0;
        for ing in input.ingredients {
            match ing.kind {
                IngredientKind::Fermentable => {
                    // 36 ppg average extract potential
                    gravity_points += ing.amount * 36.0 * efficiency / batch;
                    mcu += ing.amount * 3.0 / batch;
                }
                IngredientKind::Hop => {
                    // 5% alpha, mid-boil utilization
                    ibu += ing.amount * 0.05 * 7490.0 * 0.22 / (batch * 1.05);
                }
                _ => {}
            }
        }

        let og = 1.0 + gravity_points / 1000.0;
        // 75% apparent attenuation
        let fg = 1.0 + gravity_points * 0.25 / 1000.0;
        let abv = (og - fg) * 131.25;
        let srm = 1.4922 * mcu.powf(0.6859);

        RecipeMetrics {
            estimated_og: Some(og),
            estimated_fg: Some(fg),
            estimated_abv: Some(abv),
            estimated_ibu: Some(ibu),
            estimated_srm: Some(srm),
        }
    }
}

pub async fn run(service: &OfflineRecipeService) -> Result<()> {
    let processed = service.calculate_missing_metrics(&BrewCalc).await?;
    println!("Estimated metrics for {processed} recipes");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewlog_common::domain::Ingredient;

    #[test]
    fn estimates_scale_with_fermentables() {
        let grain = vec![Ingredient::new(
            "Pale malt".into(),
            IngredientKind::Fermentable,
            10.0,
            "lb".into(),
        )];
        let metrics = BrewCalc.compute(MetricsInput {
            batch_size: 5.0,
            batch_size_unit: "gal",
            efficiency: Some(0.72),
            ingredients: &grain,
        });

        let og = metrics.estimated_og.unwrap();
        assert!(og > 1.040 && og < 1.060);
        assert!(metrics.estimated_abv.unwrap() > 0.0);
    }

    #[test]
    fn empty_recipe_still_produces_numbers() {
        let metrics = BrewCalc.compute(MetricsInput {
            batch_size: 0.0,
            batch_size_unit: "gal",
            efficiency: None,
            ingredients: &[],
        });

        assert_eq!(metrics.estimated_og, Some(1.0));
        assert_eq!(metrics.estimated_ibu, Some(0.0));
    }
}
