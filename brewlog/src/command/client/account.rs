use brewlog_client::settings::Settings;
use clap::Parser;
use eyre::Result;

mod login;
mod logout;

#[derive(Parser, Debug)]
#[clap(infer_subcommands = true)]
pub enum Cmd {
    Login(login::Cmd),
    Logout,
}

impl Cmd {
    pub(crate) async fn run(self, settings: &Settings) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.run(settings).await,
            Self::Logout => logout::run(settings),
        }
    }
}
