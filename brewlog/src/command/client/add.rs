use brewlog_client::service::OfflineRecipeService;
use brewlog_common::domain::{Ingredient, IngredientKind, RecipeDraft};
use clap::Parser;
use eyre::{bail, Result};
use std::str::FromStr;

#[derive(Parser, Debug)]
pub struct Cmd {
    name: String,
    #[arg(long)]
    style: Option<String>,
    #[arg(long, default_value_t = 5.0)]
    batch_size: f64,
    #[arg(long, default_value = "gal")]
    batch_size_unit: String,
    #[arg(long)]
    boil_time: Option<u32>,
    #[arg(long)]
    efficiency: Option<f64>,
    #[arg(long)]
    notes: Option<String>,
    /// "kind:name:amount:unit[:timing]", e.g. "hop:Cascade:2:oz:60 min"
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,
}

impl Cmd {
    pub(crate) async fn run(self, service: &OfflineRecipeService) -> Result<()> {
        let mut ingredients = Vec::with_capacity(self.ingredients.len());
        for raw in &self.ingredients {
            ingredients.push(parse_ingredient(raw)?);
        }

        let draft = RecipeDraft {
            name: self.name,
            style: self.style,
            batch_size: self.batch_size,
            batch_size_unit: self.batch_size_unit,
            boil_time: self.boil_time,
            efficiency: self.efficiency,
            ingredients,
            notes: self.notes,
        };

        let recipe = service.create(draft).await?;
        match &recipe.sync.temp_id {
            Some(temp_id) => println!(
                "Recipe added locally ({}). Will sync as soon as the server is reachable.",
                temp_id
            ),
            None => println!("Recipe added {}", recipe.recipe.id),
        }

        Ok(())
    }
}

fn parse_ingredient(raw: &str) -> Result<Ingredient> {
    let parts = raw.split(':').collect::<Vec<_>>();
    if parts.len() < 4 {
        bail!("Expected ingredient as \"kind:name:amount:unit[:timing]\", got {raw:?}");
    }

    let kind = IngredientKind::from_str(parts[0]).unwrap_or(IngredientKind::Other);
    let amount: f64 = parts[2]
        .parse()
        .map_err(|_| eyre::eyre!("Ingredient amount is not a number: {:?}", parts[2]))?;

    let mut ingredient = Ingredient::new(parts[1].into(), kind, amount, parts[3].into());
    if let Some(timing) = parts.get(4) {
        ingredient.timing = Some((*timing).into());
    }

    Ok(ingredient)
}
