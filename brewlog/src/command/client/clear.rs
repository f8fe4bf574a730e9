use brewlog_client::service::OfflineRecipeService;
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub struct Cmd {
    /// Clear the cache of this user id instead of the current session
    #[arg(long)]
    user: Option<String>,
    /// Clear every user's offline cache on this device
    #[arg(long)]
    all: bool,
}

impl Cmd {
    pub(crate) async fn run(self, service: &OfflineRecipeService) -> Result<()> {
        if self.all {
            service.clear_user_data(None).await?;
            println!("Cleared offline data for all users");
            return Ok(());
        }

        let scope = self
            .user
            .unwrap_or_else(|| service.session().scope_id().to_string());
        service.clear_user_data(Some(&scope)).await?;
        println!("Cleared offline data for {scope}");

        Ok(())
    }
}
