use brewlog::command::BrewlogCmd;
use brewlog::VERSION;
use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    author = "Brewlog Devs",
    version = VERSION,
    )]
struct Brewlog {
    #[command(subcommand)]
    brewlog: BrewlogCmd,
}

impl Brewlog {
    fn run(self) -> Result<()> {
        self.brewlog.run()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    Brewlog::parse().run()
}
