//! File-based settings.
//!
//! Settings live in an optional TOML file. Every key is optional; whatever
//! the file sets is merged over the defaults.
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [bot]
//! room = "lobby"
//! global = false
//! credentials = "jwt..."
//!
//! [commands]
//! prefixes = ["!", "~"]
//! enable_pipes = true
//! ```

use chatpipe_core::BoxError;
use chatpipe_std::{commands::ParserSettings, config::BotConfig};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

const DEFAULT_SETTINGS_PATH: &str = "chatpipe.toml";

/// Errors raised while loading settings or installing logging.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("failed to read settings file at {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for this schema.
    #[error("failed to parse settings file at {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },
    /// A global tracing subscriber was already installed.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(#[source] BoxError),
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
        }
    }
}

/// Everything a host needs to start a bot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    /// Logging settings.
    pub logging: LogConfig,
    /// Initial bot configuration.
    pub bot: BotConfig,
    /// Initial parser settings.
    pub commands: ParserSettings,
}

/// Load settings from `path`, or from `chatpipe.toml` when `path` is
/// `None`. A missing file yields the defaults.
pub fn load(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let settings_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

    let mut settings = Settings::default();

    if !settings_path.exists() {
        return Ok(settings);
    }

    let raw = fs::read_to_string(&settings_path).map_err(|source| SettingsError::Read {
        path: settings_path.clone(),
        source,
    })?;

    let file: FileSettings = toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: settings_path,
        source,
    })?;

    file.merge_into(&mut settings);
    Ok(settings)
}

#[derive(Debug, Deserialize, Default)]
struct FileSettings {
    logging: Option<FileLogConfig>,
    bot: Option<FileBotConfig>,
    commands: Option<FileCommandConfig>,
}

impl FileSettings {
    fn merge_into(self, settings: &mut Settings) {
        if let Some(logging) = self.logging {
            logging.merge_into(&mut settings.logging);
        }

        if let Some(bot) = self.bot {
            bot.merge_into(&mut settings.bot);
        }

        if let Some(commands) = self.commands {
            commands.merge_into(&mut settings.commands);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileLogConfig {
    level: Option<String>,
}

impl FileLogConfig {
    fn merge_into(self, config: &mut LogConfig) {
        if let Some(level) = self.level {
            config.level = level;
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileBotConfig {
    room: Option<String>,
    global: Option<bool>,
    credentials: Option<String>,
}

impl FileBotConfig {
    fn merge_into(self, config: &mut BotConfig) {
        if let Some(room) = self.room {
            config.room = room;
        }

        if let Some(global) = self.global {
            config.global = global;
        }

        if let Some(credentials) = self.credentials {
            config.credentials = Some(credentials);
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct FileCommandConfig {
    prefixes: Option<Vec<String>>,
    enable_pipes: Option<bool>,
}

impl FileCommandConfig {
    fn merge_into(self, config: &mut ParserSettings) {
        if let Some(prefixes) = self.prefixes {
            config.prefixes = prefixes;
        }

        if let Some(enable_pipes) = self.enable_pipes {
            config.enable_pipes = enable_pipes;
        }
    }
}
