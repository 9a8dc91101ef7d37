//! Unix-like command pipes.
//!
//! `!roll 20 | !double | !say` runs three commands left to right. Each
//! segment is parsed on its own copy of the original record, and the
//! previous segment's result is appended to its arguments.

use super::parser::CommandParser;
use chatpipe_core::{BoxError, ChatMessage, CommandResult};
use serde_json::Value;

/// What the next pipe segment receives from the one before it.
#[derive(Debug, Clone, PartialEq)]
enum Threaded {
    /// The previous segment produced nothing; start afresh.
    Nothing,
    /// Pass this text as the trailing argument.
    Text(String),
    /// The previous segment produced something that cannot be threaded.
    Halt,
}

impl From<CommandResult> for Threaded {
    fn from(result: CommandResult) -> Self {
        match result {
            CommandResult::Silent => Threaded::Nothing,
            CommandResult::Reply(text) | CommandResult::Redirect { text, .. } => {
                Threaded::Text(text)
            }
            CommandResult::Data(value) => Threaded::from(value),
        }
    }
}

/// Strings thread as-is and arrays thread their first element.
impl From<Value> for Threaded {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Threaded::Nothing,
            Value::String(text) => Threaded::Text(text),
            Value::Array(items) => match items.into_iter().next() {
                Some(Value::String(text)) => Threaded::Text(text),
                Some(Value::Null) | None => Threaded::Halt,
                Some(first) => Threaded::Text(first.to_string()),
            },
            _ => Threaded::Halt,
        }
    }
}

impl CommandParser {
    /// Parses `message` as a pipe of commands and runs them in order.
    ///
    /// With pipes disabled, or without any `|`, this is exactly
    /// [`parse`](Self::parse) with no extra arguments. The original record
    /// is never modified. A [`CommandResult::Data`] string is threaded, an
    /// array threads its first element, and any other shape ends the pipe
    /// with [`CommandResult::Silent`].
    pub async fn parse_piped(&self, message: &ChatMessage) -> Result<CommandResult, BoxError> {
        if !self.pipes_enabled() || !message.message.contains('|') {
            return self.parse(message, Vec::new()).await;
        }

        let mut segments = message.message.split('|').map(str::trim);
        let first = segments.next().unwrap_or_default();
        let mut result = self.parse(&message.with_message(first), Vec::new()).await?;

        for segment in segments {
            let extra = match Threaded::from(result) {
                Threaded::Nothing => Vec::new(),
                Threaded::Text(text) => vec![text],
                Threaded::Halt => {
                    tracing::debug!(segment, "pipe halted on non-text result");
                    return Ok(CommandResult::Silent);
                }
            };
            result = self.parse(&message.with_message(segment), extra).await?;
        }

        Ok(result)
    }
}
