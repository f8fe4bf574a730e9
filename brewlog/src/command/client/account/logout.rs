use brewlog_client::settings::Settings;
use eyre::Result;
use std::path::PathBuf;

pub fn run(settings: &Settings) -> Result<()> {
    let session_path = PathBuf::from(&settings.session_path);

    if !session_path.exists() {
        println!("You are not logged in.");
        return Ok(());
    }

    settings.clear_session()?;
    println!("Logged out. The offline cache stays on this device.");

    Ok(())
}
