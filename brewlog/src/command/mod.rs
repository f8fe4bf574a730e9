use clap::Subcommand;
use eyre::Result;

mod client;

#[derive(Subcommand)]
pub enum BrewlogCmd {
    #[command(flatten)]
    Client(client::Cmd),
}

impl BrewlogCmd {
    pub fn run(self) -> Result<()> {
        match self {
            Self::Client(cmd) => cmd.run(),
        }
    }
}
