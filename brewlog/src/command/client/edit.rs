use brewlog_client::service::OfflineRecipeService;
use brewlog_common::domain::RecipePatch;
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub struct Cmd {
    id: String,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    style: Option<String>,
    #[arg(long)]
    batch_size: Option<f64>,
    #[arg(long)]
    batch_size_unit: Option<String>,
    #[arg(long)]
    boil_time: Option<u32>,
    #[arg(long)]
    efficiency: Option<f64>,
    #[arg(long)]
    notes: Option<String>,
}

impl Cmd {
    pub(crate) async fn run(self, service: &OfflineRecipeService) -> Result<()> {
        let patch = RecipePatch {
            name: self.name,
            style: self.style,
            batch_size: self.batch_size,
            batch_size_unit: self.batch_size_unit,
            boil_time: self.boil_time,
            efficiency: self.efficiency,
            ingredients: None,
            notes: self.notes,
        };

        let recipe = service.update(&self.id, patch).await?;
        println!(
            "Recipe updated: {} [{}]",
            recipe.recipe.name, recipe.sync.status
        );

        Ok(())
    }
}
