use brewlog_client::session::StoredSession;
use brewlog_client::settings::Settings;
use clap::Parser;
use eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub struct Cmd {
    /// User id the offline cache gets attributed to
    #[arg(long, short)]
    pub user_id: String,
    /// API token issued by the auth layer
    #[arg(long, short)]
    pub token: String,
}

impl Cmd {
    pub async fn run(self, settings: &Settings) -> Result<()> {
        let session_path = PathBuf::from(&settings.session_path);

        if session_path.exists() {
            println!("You are already logged in.");
            return Ok(());
        }

        settings.save_session(&StoredSession {
            user_id: self.user_id.clone(),
            token: self.token,
        })?;

        println!("Logged in as {}", self.user_id);
        Ok(())
    }
}
