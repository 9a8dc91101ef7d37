//! Live bot configuration.
//!
//! Every component holds a clone of the same [`ConfigHandle`] and reads it at
//! the moment it needs a value, so a change made by one command is seen by
//! the very next record of the same batch.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-wide bot settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// The bot's home room.
    pub room: String,
    /// Accept messages from every room, not just `room`.
    pub global: bool,
    /// Transport credentials. `None` connects anonymously.
    pub credentials: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            room: "global".to_owned(),
            global: false,
            credentials: None,
        }
    }
}

/// Shared, live handle to a [`BotConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigHandle {
    inner: Arc<RwLock<BotConfig>>,
}

impl ConfigHandle {
    /// Wrap a configuration.
    pub fn new(config: BotConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// A copy of the current configuration.
    pub fn snapshot(&self) -> BotConfig {
        self.read().clone()
    }

    /// The current home room.
    pub fn room(&self) -> String {
        self.read().room.clone()
    }

    /// Whether global mode is on.
    pub fn is_global(&self) -> bool {
        self.read().global
    }

    /// The current credentials.
    pub fn credentials(&self) -> Option<String> {
        self.read().credentials.clone()
    }

    /// Whether `channel` is the home room.
    pub fn is_home(&self, channel: &str) -> bool {
        self.read().room == channel
    }

    /// Whether a message arriving on `channel` is visible to the bot.
    pub fn accepts(&self, channel: &str) -> bool {
        let config = self.read();
        config.global || config.room == channel
    }

    /// Change the home room.
    pub fn set_room(&self, room: impl Into<String>) {
        self.write().room = room.into();
    }

    /// Toggle global mode.
    pub fn set_global(&self, global: bool) {
        self.write().global = global;
    }

    /// Replace the credentials.
    pub fn set_credentials(&self, credentials: Option<String>) {
        self.write().credentials = credentials;
    }

    /// Replace the whole configuration.
    pub fn replace(&self, config: BotConfig) {
        *self.write() = config;
    }

    /// Runs `f` against a view whose room is `room`, then restores the
    /// previous room.
    ///
    /// The write lock is held for the whole call: no other reader or writer
    /// observes the temporary room, and nothing can interleave between the
    /// switch and the restore.
    pub fn with_temporary_room<R>(&self, room: &str, f: impl FnOnce(&BotConfig) -> R) -> R {
        let mut config = self.write();
        let previous = std::mem::replace(&mut config.room, room.to_owned());
        let result = f(&config);
        config.room = previous;
        result
    }

    fn read(&self) -> RwLockReadGuard<'_, BotConfig> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BotConfig> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<BotConfig> for ConfigHandle {
    fn from(config: BotConfig) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(room: &str, global: bool) -> ConfigHandle {
        ConfigHandle::new(BotConfig {
            room: room.into(),
            global,
            credentials: None,
        })
    }

    #[test]
    fn defaults_match_anonymous_global_room() {
        let config = BotConfig::default();
        assert_eq!(config.room, "global");
        assert!(!config.global);
        assert!(config.credentials.is_none());
    }

    #[test]
    fn clones_share_state() {
        let config = handle("alpha", false);
        let other = config.clone();
        other.set_room("beta");
        assert_eq!(config.room(), "beta");
    }

    #[test]
    fn accepts_home_room_or_everything_in_global_mode() {
        let config = handle("alpha", false);
        assert!(config.accepts("alpha"));
        assert!(!config.accepts("beta"));

        config.set_global(true);
        assert!(config.accepts("beta"));
    }

    #[test]
    fn temporary_room_is_visible_inside_and_restored_after() {
        let config = handle("alpha", false);
        let seen = config.with_temporary_room("beta", |view| view.room.clone());

        assert_eq!(seen, "beta");
        assert_eq!(config.room(), "alpha");
    }
}
