//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chatpipe::{
    Bot, BotConfig, ChatMessage, CommandOptions, ConfigHandle, Invocation,
    testing::RecordingTransport,
};
use std::{
    io,
    sync::{Arc, Mutex},
};

pub const HOME: &str = "alpha";

/// A bot listening in [`HOME`] with `echo` and `upper` registered.
pub fn bot() -> (Bot<RecordingTransport>, RecordingTransport, ConfigHandle) {
    let transport = RecordingTransport::new();
    let config = ConfigHandle::new(BotConfig {
        room: HOME.to_owned(),
        ..BotConfig::default()
    });
    let bot = Bot::builder(transport.clone())
        .name("test-bot")
        .config(config.clone())
        .build();

    bot.register(
        "echo",
        |inv: Invocation| async move { inv.rest() },
        CommandOptions::new(),
    );
    bot.register(
        "upper",
        |inv: Invocation| async move { inv.rest().to_uppercase() },
        CommandOptions::new(),
    );

    (bot, transport, config)
}

pub fn home(text: &str) -> ChatMessage {
    ChatMessage::new(HOME, text)
}

/// Captures formatted log output for assertions.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `future` to completion with every event captured.
pub fn with_logs<F: std::future::Future>(future: F) -> (F::Output, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();

    let output = tracing::subscriber::with_default(subscriber, || {
        futures::executor::block_on(future)
    });
    (output, logs.contents())
}
