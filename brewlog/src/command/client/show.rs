use brewlog_client::service::OfflineRecipeService;
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub struct Cmd {
    id: String,
}

impl Cmd {
    pub(crate) async fn run(self, service: &OfflineRecipeService) -> Result<()> {
        let Some(el) = service.get_by_id(&self.id).await? else {
            println!("Recipe not found");
            return Ok(());
        };

        println!("{}", el.recipe.name);
        if let Some(style) = &el.recipe.style {
            println!("Style: {style}");
        }
        println!(
            "Batch: {} {}",
            el.recipe.batch_size, el.recipe.batch_size_unit
        );
        if let Some(boil_time) = el.recipe.boil_time {
            println!("Boil: {boil_time} min");
        }

        if !el.recipe.ingredients.is_empty() {
            println!("Ingredients:");
            for ing in &el.recipe.ingredients {
                println!("  {} {} {} ({})", ing.amount, ing.unit, ing.name, ing.kind);
            }
        }

        let metrics = &el.recipe.metrics;
        if !metrics.is_empty() {
            println!("Estimates:");
            if let Some(og) = metrics.estimated_og {
                println!("  OG:  {og:.3}");
            }
            if let Some(fg) = metrics.estimated_fg {
                println!("  FG:  {fg:.3}");
            }
            if let Some(abv) = metrics.estimated_abv {
                println!("  ABV: {abv:.1}%");
            }
            if let Some(ibu) = metrics.estimated_ibu {
                println!("  IBU: {ibu:.0}");
            }
            if let Some(srm) = metrics.estimated_srm {
                println!("  SRM: {srm:.1}");
            }
        }

        println!("Sync: {} (needs_sync: {})", el.sync.status, el.sync.needs_sync);
        if let Some(original) = &el.sync.original {
            println!("Conflicts with server copy updated at {}", original.updated_at);
        }

        Ok(())
    }
}
