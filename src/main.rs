use clap::Parser;
use iasi_traffic::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let config = cli::bootstrap(&args.global)?;

    match args.command {
        Command::Collect => cli::collect::run_all(&config).await,
        Command::Flow => cli::collect::run_flow(&config).await,
        Command::Incidents => cli::collect::run_incidents(&config).await,
        Command::Summary => cli::collect::run_summary(&config).await,
        Command::Speeds(speeds) => cli::speeds::run(&config, speeds).await,
        Command::Render(render) => cli::render::run(&config, render).await,
    }
}
