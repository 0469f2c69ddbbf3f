#![warn(clippy::all, clippy::pedantic)]

use anyhow::Result;
use clap::Parser;
use prova::Config;
use prova::app::dispatch::dispatch;
use prova::cli::Cli;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_or_init()?;
    config.apply_env_overrides();
    config.validate()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.observability.level())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    dispatch(cli, config).await?;
    Ok(())
}
