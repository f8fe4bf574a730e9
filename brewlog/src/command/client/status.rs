use brewlog_client::service::OfflineRecipeService;
use eyre::Result;
use time::format_description::well_known::Rfc3339;

pub async fn run(service: &OfflineRecipeService) -> Result<()> {
    let online = service.is_online().await;
    let report = service.get_sync_status().await?;

    println!("Connection: {}", if online { "online" } else { "offline" });
    println!("Recipes: {}", report.total_recipes);
    println!("Pending sync: {}", report.pending_sync);
    println!("Conflicts: {}", report.conflicts);
    println!("Failed: {}", report.failed_sync);
    println!(
        "Last sync: {}",
        report
            .last_sync
            .and_then(|x| x.format(&Rfc3339).ok())
            .unwrap_or_else(|| "never".to_string())
    );

    Ok(())
}
