//! WQM CLI - Command line tool for the water-quality sensor feed.

use clap::Parser;
use log::debug;

#[derive(Parser)]
#[command(
    name = "wqm-cli",
    version,
    about = "Water-quality sensor feed monitor"
)]
struct Cli {
    #[command(subcommand)]
    command: wqm_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    debug!("wqm-cli {}", env!("CARGO_PKG_VERSION"));
    wqm_cmd::run(cli.command).await
}
