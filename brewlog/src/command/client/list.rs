use brewlog_client::service::OfflineRecipeService;
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub struct Cmd {
    /// Only show recipes with unsynced changes
    #[arg(short, long)]
    pending: bool,
}

impl Cmd {
    pub(crate) async fn run(self, service: &OfflineRecipeService) -> Result<()> {
        let recipes = service.get_all().await?;

        for el in recipes {
            if self.pending && !el.sync.needs_sync {
                continue;
            }
            let id = if el.recipe.id.is_empty() {
                el.sync.temp_id.as_deref().unwrap_or("-")
            } else {
                el.recipe.id.as_str()
            };
            println!(
                "[{}] {} ({}) {}",
                el.sync.status,
                el.recipe.name,
                el.recipe.style.as_deref().unwrap_or("no style"),
                id,
            );
        }

        Ok(())
    }
}
