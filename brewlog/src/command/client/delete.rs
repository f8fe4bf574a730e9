use brewlog_client::service::OfflineRecipeService;
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub struct Cmd {
    id: String,
}

impl Cmd {
    pub(crate) async fn run(self, service: &OfflineRecipeService) -> Result<()> {
        service.delete(&self.id).await?;
        println!("Recipe deleted");

        Ok(())
    }
}
