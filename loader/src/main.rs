use clap::Parser;
use pwakit_loader::Cli;
use pwakit_loader::run_main;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_main(cli).await
}
