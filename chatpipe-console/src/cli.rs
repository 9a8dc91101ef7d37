use chatpipe::settings::Settings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "chatpipe", about = "Chat bot pipeline on the console")]
pub struct Cli {
    /// Path to settings file (default: ./chatpipe.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Home room, overrides the settings file
    #[arg(short, long)]
    pub room: Option<String>,

    /// Answer commands from every room
    #[arg(short, long)]
    pub global: bool,
}

impl Cli {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(room) = &self.room {
            settings.bot.room = room.clone();
        }
        if self.global {
            settings.bot.global = true;
        }
    }
}
