//! Reply instructions and their conversions.

use crate::error::BoxError;
use serde_json::Value;

/// What the engine should do with a consumer's or command's output.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CommandResult {
    /// Nothing to send.
    #[default]
    Silent,
    /// Send the text to the home room.
    Reply(String),
    /// Send the text to `channel`, then return to the home room.
    Redirect {
        /// Text to send.
        text: String,
        /// Room to send it to.
        channel: String,
    },
    /// Opaque data for the next pipe stage. Never sent.
    Data(Value),
}

impl CommandResult {
    /// A reply to the home room.
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply(text.into())
    }

    /// A reply to a specific room.
    pub fn redirect(text: impl Into<String>, channel: impl Into<String>) -> Self {
        Self::Redirect {
            text: text.into(),
            channel: channel.into(),
        }
    }

    /// Returns `true` for [`CommandResult::Silent`].
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::Silent)
    }

    /// The text this result would send, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Reply(text) | Self::Redirect { text, .. } => Some(text),
            Self::Silent | Self::Data(_) => None,
        }
    }
}

/// Trait for converting a handler's output into a [`CommandResult`].
///
/// # Default Implementations
///
/// - `()` → `Silent`
/// - `String`, `&'static str` → `Reply`
/// - `(String, String)` → `Redirect` (text, channel)
/// - `serde_json::Value` → `Data`
/// - `Option<T>` → `T`, or `Silent` for `None`
/// - `Result<T, E>` → `T`, or the error
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be turned into a `CommandResult`",
    label = "missing `IntoCommandResult` implementation",
    note = "Return `()`, a `String`, a `(text, channel)` pair, or a `CommandResult`."
)]
pub trait IntoCommandResult {
    /// Convert the output into a reply instruction or an error.
    fn into_command_result(self) -> Result<CommandResult, BoxError>;
}

impl IntoCommandResult for CommandResult {
    fn into_command_result(self) -> Result<CommandResult, BoxError> {
        Ok(self)
    }
}

impl IntoCommandResult for () {
    fn into_command_result(self) -> Result<CommandResult, BoxError> {
        Ok(CommandResult::Silent)
    }
}

impl IntoCommandResult for String {
    fn into_command_result(self) -> Result<CommandResult, BoxError> {
        Ok(CommandResult::Reply(self))
    }
}

impl IntoCommandResult for &'static str {
    fn into_command_result(self) -> Result<CommandResult, BoxError> {
        Ok(CommandResult::Reply(self.to_owned()))
    }
}

impl IntoCommandResult for (String, String) {
    fn into_command_result(self) -> Result<CommandResult, BoxError> {
        let (text, channel) = self;
        Ok(CommandResult::Redirect { text, channel })
    }
}

impl IntoCommandResult for Value {
    fn into_command_result(self) -> Result<CommandResult, BoxError> {
        Ok(CommandResult::Data(self))
    }
}

impl<T: IntoCommandResult> IntoCommandResult for Option<T> {
    fn into_command_result(self) -> Result<CommandResult, BoxError> {
        match self {
            Some(t) => t.into_command_result(),
            None => Ok(CommandResult::Silent),
        }
    }
}

impl<T, E> IntoCommandResult for Result<T, E>
where
    T: IntoCommandResult,
    E: Into<BoxError>,
{
    fn into_command_result(self) -> Result<CommandResult, BoxError> {
        match self {
            Ok(t) => t.into_command_result(),
            Err(e) => Err(e.into()),
        }
    }
}
