//! Message trait and the chat message record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A marker trait for values flowing through the pipeline.
///
/// Messages must be `Send + Sync + 'static` so stages and handlers can be
/// shared across tasks.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "All values flowing through chatpipe must be thread-safe and static."
)]
pub trait Message: Send + Sync + 'static {}

impl Message for () {}
impl Message for bool {}
impl Message for String {}
impl Message for &'static str {}
impl<T: Message> Message for Box<T> {}
impl<T: Message> Message for std::sync::Arc<T> {}
impl<T: Message> Message for Vec<T> {}
impl<T: Message> Message for Option<T> {}

/// One chat message as delivered by the transport.
///
/// `channel` and `message` are the only fields the pipeline reads. Every
/// other wire field (sender, timestamp, badges, ...) lands in `extra` and is
/// carried along untouched, including through serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Room the message arrived on.
    pub channel: String,
    /// Text or HTML body.
    pub message: String,
    /// Passthrough fields the pipeline never interprets.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message for ChatMessage {}

impl ChatMessage {
    /// Create a record with no passthrough fields.
    pub fn new(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            message: message.into(),
            extra: Map::new(),
        }
    }

    /// Returns a copy of this record with the body replaced.
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self {
            channel: self.channel.clone(),
            message: message.into(),
            extra: self.extra.clone(),
        }
    }

    /// Attach a passthrough field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Read a passthrough field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}
