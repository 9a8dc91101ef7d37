//! The chat network collaborator.

use crate::error::BoxError;
use serde::Serialize;
use std::future::Future;

/// A message handed to the transport for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    /// Body to send.
    pub message: String,
    /// Destination room.
    pub channel: String,
    /// Whether the bot is in global chat mode.
    pub global: bool,
    /// Whether the bot badge is shown next to the message.
    pub show_badge: bool,
}

/// The chat network client the pipeline is hosted on.
///
/// Inbound batches are not part of this trait: the host feeds them to the
/// engine (see `Bot::run` in `chatpipe`). Reconnection, retries and timeouts
/// are the transport's own business.
pub trait Transport: Send + Sync + 'static {
    /// Connect to `room`. `None` credentials means anonymous mode.
    fn init(
        &self,
        room: &str,
        credentials: Option<&str>,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Fire-and-forget delivery.
    ///
    /// The engine never holds its configuration lock across this call.
    fn send_message(&self, outbound: OutboundMessage);

    /// Refresh the transport's username cache.
    fn update_usernames(&self) -> impl Future<Output = Result<(), BoxError>> + Send {
        std::future::ready(Ok(()))
    }

    /// Viewers of the current room, as far as the transport knows.
    fn channel_viewers(&self) -> Vec<String> {
        Vec::new()
    }
}
