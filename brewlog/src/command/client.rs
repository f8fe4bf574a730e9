use brewlog_client::api_client::SyncClient;
use brewlog_client::offline_store::OfflineStore;
use brewlog_client::service::OfflineRecipeService;
use brewlog_client::session::Session;
use brewlog_client::settings::Settings;
use brewlog_client::store::KvStore;
use clap::Parser;
use eyre::Result;

mod account;
mod add;
mod cleanup;
mod clear;
mod delete;
mod edit;
mod info;
mod list;
mod metrics;
mod show;
mod status;
mod sync;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    Info,
    List(list::Cmd),
    Show(show::Cmd),
    Add(add::Cmd),
    Edit(edit::Cmd),
    Delete(delete::Cmd),
    Sync(sync::Cmd),
    Status,
    Cleanup,
    Metrics,
    Clear(clear::Cmd),
    #[command(subcommand)]
    Account(account::Cmd),
}

impl Cmd {
    #[tokio::main]
    pub async fn run(self) -> Result<()> {
        let settings = Settings::new()?;

        match self {
            Self::Info => {
                info::run(&settings);
                Ok(())
            }
            Self::Account(cmd) => cmd.run(&settings).await,
            cmd => {
                let service = build_service(&settings).await?;
                match cmd {
                    Self::List(cmd) => cmd.run(&service).await,
                    Self::Show(cmd) => cmd.run(&service).await,
                    Self::Add(cmd) => cmd.run(&service).await,
                    Self::Edit(cmd) => cmd.run(&service).await,
                    Self::Delete(cmd) => cmd.run(&service).await,
                    Self::Sync(cmd) => cmd.run(&service).await,
                    Self::Status => status::run(&service).await,
                    Self::Cleanup => cleanup::run(&service).await,
                    Self::Metrics => metrics::run(&service).await,
                    Self::Clear(cmd) => cmd.run(&service).await,
                    Self::Info | Self::Account(_) => unreachable!(),
                }
            }
        }
    }
}

pub(crate) async fn build_service(settings: &Settings) -> Result<OfflineRecipeService> {
    let kv = KvStore::new(&settings.db_path).await?;
    let store = OfflineStore::new(kv);
    let session = Session::load(settings);
    let client = SyncClient::new(&settings.server_address, session.token.as_deref())?;

    Ok(OfflineRecipeService::new(
        settings.clone(),
        store,
        client,
        session,
    ))
}
