//! Command parsing and dispatch.

use super::registry::CommandRegistry;
use crate::config::ConfigHandle;
use chatpipe_core::{BoxError, ChatMessage, CommandError, CommandResult, Handler, Invocation};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    future::Future,
    sync::{Arc, PoisonError, RwLock},
};

/// Parser settings, adjustable at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Default command prefixes.
    pub prefixes: Vec<String>,
    /// Allow chaining commands with `|`.
    pub enable_pipes: bool,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            prefixes: vec!["!".to_owned()],
            enable_pipes: true,
        }
    }
}

/// Resolves chat messages into registered commands and runs them.
///
/// Cloning is cheap; clones share the registry, configuration and settings.
///
/// # Prefixes
///
/// A message is a command if it starts with one of the default prefixes or
/// with a registered command's custom prefix. When several match, the
/// longest wins and is the one stripped.
#[derive(Clone)]
pub struct CommandParser {
    registry: Arc<CommandRegistry>,
    config: ConfigHandle,
    settings: Arc<RwLock<ParserSettings>>,
}

impl CommandParser {
    /// Create a parser with default settings.
    pub fn new(registry: Arc<CommandRegistry>, config: ConfigHandle) -> Self {
        Self {
            registry,
            config,
            settings: Arc::new(RwLock::new(ParserSettings::default())),
        }
    }

    /// Replace the settings.
    pub fn with_settings(self, settings: ParserSettings) -> Self {
        self.set_settings(settings);
        self
    }

    /// The command registry.
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// The live configuration.
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// A copy of the current settings.
    pub fn settings(&self) -> ParserSettings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the settings.
    pub fn set_settings(&self, settings: ParserSettings) {
        *self.settings.write().unwrap_or_else(PoisonError::into_inner) = settings;
    }

    /// Replace the default prefixes.
    pub fn set_prefixes(&self, prefixes: Vec<String>) {
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .prefixes = prefixes;
    }

    /// Turn `|` chaining on or off.
    pub fn set_pipes_enabled(&self, enabled: bool) {
        self.settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .enable_pipes = enabled;
    }

    pub(crate) fn pipes_enabled(&self) -> bool {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .enable_pipes
    }

    /// The longest default or custom prefix `text` starts with.
    pub fn matched_prefix(&self, text: &str) -> Option<String> {
        let defaults = self.settings().prefixes;
        defaults
            .into_iter()
            .chain(self.registry.custom_prefixes())
            .filter(|prefix| text.starts_with(prefix.as_str()))
            .max_by_key(String::len)
    }

    /// Filter: returns the message if it is a command, `None` otherwise.
    pub fn is_command(&self, message: &ChatMessage) -> Option<ChatMessage> {
        self.matched_prefix(&message.message)
            .map(|_| message.clone())
    }

    /// Parses `message` as a single command and runs it.
    ///
    /// `extra` is appended after the message's own arguments. Unknown
    /// commands and home-room-only commands issued elsewhere yield
    /// [`CommandResult::Silent`]; only handler failures are errors.
    pub async fn parse(
        &self,
        message: &ChatMessage,
        extra: Vec<String>,
    ) -> Result<CommandResult, BoxError> {
        let body = match self.matched_prefix(&message.message) {
            Some(prefix) => &message.message[prefix.len()..],
            None => message.message.as_str(),
        };
        let mut tokens = body.split(' ');
        let name = tokens.next().unwrap_or_default();

        let Some(entry) = self.registry.lookup(name) else {
            tracing::info!(command = name, "no command named {name} found");
            return Ok(CommandResult::Silent);
        };
        if !entry.is_global() && !self.config.is_home(&message.channel) {
            tracing::debug!(command = name, channel = %message.channel, "command is home-room only");
            return Ok(CommandResult::Silent);
        }

        let args = tokens.map(str::to_owned).chain(extra).collect();
        let invocation = Invocation {
            message: message.with_message(body),
            args,
        };
        tracing::debug!(command = name, args = ?invocation.args, "running command");
        entry.invoke(invocation).await.map_err(|source| {
            CommandError::Handler {
                name: name.to_owned(),
                source,
            }
            .into()
        })
    }
}

impl fmt::Debug for CommandParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandParser")
            .field("registry", &self.registry)
            .field("settings", &self.settings())
            .finish_non_exhaustive()
    }
}

/// The parser is the default consumer: every message that passed the
/// filters is run as a (possibly piped) command.
impl Handler<ChatMessage> for CommandParser {
    type Output = Result<CommandResult, BoxError>;

    fn call(&self, input: ChatMessage) -> impl Future<Output = Self::Output> + Send {
        async move {
            tracing::debug!(channel = %input.channel, message = %input.message, "consuming");
            self.parse_piped(&input).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{commands::CommandOptions, config::BotConfig};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn parser(room: &str) -> CommandParser {
        let config = ConfigHandle::new(BotConfig {
            room: room.into(),
            ..BotConfig::default()
        });
        CommandParser::new(Arc::new(CommandRegistry::new()), config)
    }

    fn echo() -> impl Handler<Invocation, Output = String> {
        |inv: Invocation| async move { inv.rest() }
    }

    #[test]
    fn is_command_checks_default_and_custom_prefixes() {
        let parser = parser("alpha");
        assert!(parser.is_command(&ChatMessage::new("alpha", "!echo")).is_some());
        assert!(parser.is_command(&ChatMessage::new("alpha", "echo!")).is_none());
        assert!(parser.is_command(&ChatMessage::new("alpha", "?w")).is_none());

        parser
            .registry()
            .register("w", echo(), CommandOptions::new().prefix("?"));
        assert!(parser.is_command(&ChatMessage::new("alpha", "?w")).is_some());
    }

    #[test]
    fn longest_prefix_wins() {
        let parser = parser("alpha");
        parser.set_prefixes(vec!["!".into(), "!!".into()]);
        assert_eq!(parser.matched_prefix("!!echo").as_deref(), Some("!!"));
        assert_eq!(parser.matched_prefix("!echo").as_deref(), Some("!"));
        assert_eq!(parser.matched_prefix("echo"), None);
    }

    #[tokio::test]
    async fn runs_handler_with_arguments() {
        let parser = parser("alpha");
        parser.registry().register("echo", echo(), CommandOptions::new());

        let result = parser
            .parse(&ChatMessage::new("alpha", "!echo hi there"), Vec::new())
            .await
            .unwrap();
        assert_eq!(result, CommandResult::reply("hi there"));
    }

    #[tokio::test]
    async fn extra_arguments_follow_message_arguments() {
        let parser = parser("alpha");
        parser.registry().register(
            "args",
            |inv: Invocation| async move { inv.args.join(",") },
            CommandOptions::new(),
        );

        let result = parser
            .parse(&ChatMessage::new("alpha", "!args a  b"), vec!["piped".into()])
            .await
            .unwrap();
        assert_eq!(result, CommandResult::reply("a,,b,piped"));
    }

    #[tokio::test]
    async fn handler_sees_stripped_message_with_same_channel() {
        let parser = parser("alpha");
        parser.registry().register(
            "where",
            |inv: Invocation| async move { format!("{}:{}", inv.channel(), inv.message.message) },
            CommandOptions::new(),
        );

        let result = parser
            .parse(&ChatMessage::new("alpha", "!where now"), Vec::new())
            .await
            .unwrap();
        assert_eq!(result, CommandResult::reply("alpha:where now"));
    }

    #[tokio::test]
    async fn custom_prefix_is_stripped() {
        let parser = parser("alpha");
        parser
            .registry()
            .register("w", echo(), CommandOptions::new().prefix("?"));

        let result = parser
            .parse(&ChatMessage::new("alpha", "?w oslo"), Vec::new())
            .await
            .unwrap();
        assert_eq!(result, CommandResult::reply("oslo"));
    }

    #[tokio::test]
    async fn unknown_command_is_silent() {
        let parser = parser("alpha");
        let result = parser
            .parse(&ChatMessage::new("alpha", "!nope"), Vec::new())
            .await
            .unwrap();
        assert!(result.is_silent());
    }

    #[tokio::test]
    async fn scoped_command_only_runs_in_home_room() {
        let parser = parser("alpha");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        parser.registry().register(
            "secret",
            move |_inv: Invocation| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            },
            CommandOptions::new().scoped(),
        );

        let off_room = parser
            .parse(&ChatMessage::new("beta", "!secret"), Vec::new())
            .await
            .unwrap();
        assert!(off_room.is_silent());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let home = parser
            .parse(&ChatMessage::new("alpha", "!secret"), Vec::new())
            .await
            .unwrap();
        assert_eq!(home, CommandResult::reply("ok"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn handler_errors_name_the_command() {
        let parser = parser("alpha");
        parser.registry().register(
            "broken",
            |_inv: Invocation| async move { Err::<String, _>(std::io::Error::other("backend down")) },
            CommandOptions::new(),
        );

        let err = parser
            .parse(&ChatMessage::new("alpha", "!broken"), Vec::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "command `broken` failed: backend down");
    }
}
