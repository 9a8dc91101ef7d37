mod cli;
mod commands;
mod console;

use anyhow::{Context, Result};
use chatpipe::{Bot, settings};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let mut settings = settings::load(cli.config.as_deref()).context("failed to load settings")?;
    cli.apply(&mut settings);
    chatpipe::logging::init(&settings.logging)?;

    let transport = console::ConsoleTransport;
    let bot = Bot::builder(transport)
        .name("console")
        .config(settings.bot)
        .parser_settings(settings.commands)
        .build();
    commands::install(&bot);

    tracing::info!(commands = ?bot.registry().names(), "ready, type `!help`");
    bot.start(console::stdin_batches(bot.config().clone()))
        .await
        .context("bot stopped")?;
    Ok(())
}
