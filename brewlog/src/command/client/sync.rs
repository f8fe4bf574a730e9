use brewlog_client::service::OfflineRecipeService;
use clap::Parser;
use eyre::Result;

#[derive(Parser, Debug)]
pub struct Cmd {
    /// Retry entities that already exhausted their attempts
    #[arg(short, long)]
    force: bool,
}

impl Cmd {
    pub(crate) async fn run(self, service: &OfflineRecipeService) -> Result<()> {
        if !service.is_online().await {
            println!("Offline. Changes are kept locally and sync on reconnect.");
            return Ok(());
        }

        let summary = service.sync_pending_changes(self.force).await?;
        println!(
            "Sync done. {} synced / {} failed",
            summary.success, summary.failed
        );

        Ok(())
    }
}
