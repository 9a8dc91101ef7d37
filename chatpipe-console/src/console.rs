//! Stdin/stdout transport.
//!
//! Every input line is a one-record batch. A line starting with `#room `
//! arrives from that room, anything else from the home room.

use chatpipe::{BoxError, ChatMessage, ConfigHandle, OutboundMessage, Transport};
use futures::{Stream, stream};
use tokio::io::{AsyncBufReadExt, BufReader};

pub struct ConsoleTransport;

impl Transport for ConsoleTransport {
    async fn init(&self, room: &str, credentials: Option<&str>) -> Result<(), BoxError> {
        tracing::info!(room, authenticated = credentials.is_some(), "console attached");
        Ok(())
    }

    fn send_message(&self, outbound: OutboundMessage) {
        println!("[{}] {}", outbound.channel, outbound.message);
    }
}

pub fn stdin_batches(config: ConfigHandle) -> impl Stream<Item = Vec<ChatMessage>> {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    stream::unfold((lines, config), |(mut lines, config)| async move {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let message = parse_line(&line, &config.room());
                Some((vec![message], (lines, config)))
            }
            Ok(None) => None,
            Err(error) => {
                tracing::error!(%error, "stdin closed");
                None
            }
        }
    })
}

fn parse_line(line: &str, home: &str) -> ChatMessage {
    match line.strip_prefix('#').and_then(|rest| rest.split_once(' ')) {
        Some((room, text)) => ChatMessage::new(room, text),
        None => ChatMessage::new(home, line),
    }
}
