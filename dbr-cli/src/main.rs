//! DBR CLI - is Dublin Bikes usage impacted by rainfall?

use clap::Parser;
use dbr_cmd::{AnalyzeArgs, Command};
use log::info;

#[derive(Parser)]
#[command(
    name = "dbr-cli",
    version,
    about = "Dublin Bikes usage versus rainfall analysis"
)]
struct Cli {
    /// Defaults to `analyze` with the standard input file names
    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| {
        info!("No subcommand given; running analyze with default paths");
        Command::Analyze(AnalyzeArgs::default())
    });
    dbr_cmd::run(command)
}
