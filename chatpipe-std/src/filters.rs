//! Standard filters.

use crate::{commands::CommandParser, config::ConfigHandle};
use chatpipe_core::{BoxError, ChatMessage, Stage};

/// Drops messages from rooms the bot is not listening to.
///
/// A message passes if it arrived on the home room, or if global mode is on.
/// The configuration is read on every call.
#[derive(Debug, Clone)]
pub struct RoomCheck {
    config: ConfigHandle,
}

impl RoomCheck {
    /// Create a room check over a live configuration.
    pub fn new(config: ConfigHandle) -> Self {
        Self { config }
    }
}

impl Stage<ChatMessage> for RoomCheck {
    type Output = ChatMessage;

    fn apply(&self, input: &ChatMessage) -> Result<Option<ChatMessage>, BoxError> {
        Ok(self.config.accepts(&input.channel).then(|| input.clone()))
    }
}

/// Drops messages that are not commands. See [`CommandParser::is_command`].
#[derive(Clone)]
pub struct CommandFilter {
    parser: CommandParser,
}

impl CommandFilter {
    /// Create a command filter sharing `parser`'s registry and prefixes.
    pub fn new(parser: CommandParser) -> Self {
        Self { parser }
    }
}

impl Stage<ChatMessage> for CommandFilter {
    type Output = ChatMessage;

    fn apply(&self, input: &ChatMessage) -> Result<Option<ChatMessage>, BoxError> {
        Ok(self.parser.is_command(input))
    }
}
