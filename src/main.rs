use anyhow::{Context, Result};
use clap::Parser;
use symphony::{SymBotClient, SymConfig};

use symphony_bot::config::Cli;
use symphony_bot::{bots, logging};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.json_logs)?;

    let config = SymConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    let bot = SymBotClient::connect(config)
        .await
        .context("failed to connect bot")?;
    tracing::info!(
        target = "symphony_bot",
        user_id = ?bot.bot_user_id(),
        sdk = symphony::SDK_VERSION,
        "connected"
    );

    if let Err(error) = bots::start(&bot, &cli.command).await {
        bot.shutdown().await;
        return Err(error);
    }

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
    tracing::info!(target = "symphony_bot", "shutting down");
    bot.shutdown().await;
    Ok(())
}
