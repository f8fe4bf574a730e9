use brewlog_client::service::OfflineRecipeService;
use eyre::Result;

pub async fn run(service: &OfflineRecipeService) -> Result<()> {
    let tombstones = service.cleanup_tombstones().await?;
    let stale = service.cleanup_stale_data().await?;
    println!("Cleanup done. {tombstones} tombstones / {stale} stale records removed");

    Ok(())
}
