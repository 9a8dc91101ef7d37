//! # Pipeline Engine
//!
//! [`Bot`] takes batches of raw chat messages from the transport and runs
//! each record through three phases:
//!
//! 1. **Normalize**: the transformer chain (HTML reduction by default)
//! 2. **Gatekeep**: the filter chain (room check, then command detection)
//! 3. **Consume**: the consumer (the piped command parser by default),
//!    whose [`CommandResult`] decides whether and where to reply
//!
//! Records are processed one at a time, in arrival order. A failing record
//! is logged and skipped; it never aborts the rest of its batch.

use chatpipe_core::{
    BoxError, BoxHandler, BoxStage, ChatMessage, ChatpipeError, CommandResult, Handler,
    IntoCommandResult, Invocation, OutboundMessage, Stage, Transport, chain_all, compose_all,
};
use chatpipe_std::{
    commands::{CommandEntry, CommandOptions, CommandParser, CommandRegistry, ParserSettings},
    config::{BotConfig, ConfigHandle},
    filters::{CommandFilter, RoomCheck},
    html::ReduceHtml,
    logging::Logged,
};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;

/// Errors that stop the bot.
#[derive(Error, Debug)]
pub enum BotError {
    /// The transport could not connect.
    #[error("transport failed to initialize: {0}")]
    TransportInit(#[source] BoxError),
}

/// The message pipeline bound to a transport.
pub struct Bot<T> {
    name: String,
    transport: T,
    config: ConfigHandle,
    parser: CommandParser,
    transform: BoxStage<ChatMessage, ChatMessage>,
    filter: BoxStage<ChatMessage, ChatMessage>,
    consumer: BoxHandler<ChatMessage>,
}

impl<T: Transport> Bot<T> {
    /// Start building a bot on `transport`.
    pub fn builder(transport: T) -> BotBuilder<T> {
        BotBuilder::new(transport)
    }

    /// The live configuration.
    pub fn config(&self) -> &ConfigHandle {
        &self.config
    }

    /// The command parser.
    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    /// The command registry.
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        self.parser.registry()
    }

    /// The transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Register a command. See [`CommandRegistry::register`].
    pub fn register<H>(
        &self,
        name: impl Into<String>,
        handler: H,
        options: CommandOptions,
    ) -> Option<Arc<CommandEntry>>
    where
        H: Handler<Invocation>,
        H::Output: IntoCommandResult,
    {
        self.registry().register(name, handler, options)
    }

    /// Connect the transport using the current room and credentials.
    pub async fn init(&self) -> Result<(), BotError> {
        let config = self.config.snapshot();
        tracing::info!(
            bot = %self.name,
            room = %config.room,
            anonymous = config.credentials.is_none(),
            "connecting"
        );
        self.transport
            .init(&config.room, config.credentials.as_deref())
            .await
            .map_err(BotError::TransportInit)
    }

    /// Process batches until the stream ends. A batch is fully processed
    /// before the next one is pulled.
    pub async fn run<S>(&self, batches: S)
    where
        S: Stream<Item = Vec<ChatMessage>>,
    {
        let mut batches = std::pin::pin!(batches);
        while let Some(batch) = batches.next().await {
            self.process(batch).await;
        }
    }

    /// [`init`](Self::init), then [`run`](Self::run).
    pub async fn start<S>(&self, batches: S) -> Result<(), BotError>
    where
        S: Stream<Item = Vec<ChatMessage>>,
    {
        self.init().await?;
        self.run(batches).await;
        Ok(())
    }

    /// Process one batch, in order.
    pub async fn process(&self, batch: Vec<ChatMessage>) {
        let span = tracing::info_span!("batch", bot = %self.name, size = batch.len());
        async {
            for message in batch {
                if let Err(error) = self.process_one(message).await {
                    tracing::warn!(%error, "dropped message");
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run a single record through the pipeline and deliver the result.
    ///
    /// A veto from any stage is `Ok(())`.
    pub async fn process_one(&self, message: ChatMessage) -> Result<(), ChatpipeError> {
        let Some(normalized) = self
            .transform
            .apply(&message)
            .map_err(ChatpipeError::Stage)?
        else {
            return Ok(());
        };
        if self
            .filter
            .apply(&normalized)
            .map_err(ChatpipeError::Stage)?
            .is_none()
        {
            return Ok(());
        }

        let result = self
            .consumer
            .call(normalized)
            .await
            .map_err(ChatpipeError::Consumer)?;
        self.deliver(result);
        Ok(())
    }

    /// Act on a consumer's result.
    pub fn deliver(&self, result: CommandResult) {
        match result {
            CommandResult::Silent => {}
            CommandResult::Reply(text) => self.send(&text),
            CommandResult::Redirect { text, channel } => self.send_to_channel(&text, &channel),
            CommandResult::Data(value) => {
                tracing::debug!(%value, "consumer returned data, nothing to send");
            }
        }
    }

    /// Send `text` to the home room.
    pub fn send(&self, text: &str) {
        let message = outbound(text, &self.config.snapshot());
        self.dispatch(message);
    }

    /// Send `text` to `channel`, then return to the home room.
    ///
    /// The message is addressed while the room is switched and handed to
    /// the transport once the home room is back, so the transport may read
    /// the configuration from `send_message`.
    pub fn send_to_channel(&self, text: &str, channel: &str) {
        let message = self
            .config
            .with_temporary_room(channel, |config| outbound(text, config));
        self.dispatch(message);
    }

    /// Passthrough to [`Transport::update_usernames`].
    pub async fn update_usernames(&self) -> Result<(), BoxError> {
        self.transport.update_usernames().await
    }

    /// Passthrough to [`Transport::channel_viewers`].
    pub fn channel_viewers(&self) -> Vec<String> {
        self.transport.channel_viewers()
    }

    fn dispatch(&self, outbound: OutboundMessage) {
        tracing::info!(channel = %outbound.channel, "Sent message: \"{}\"", outbound.message);
        self.transport.send_message(outbound);
    }
}

fn outbound(text: &str, config: &BotConfig) -> OutboundMessage {
    OutboundMessage {
        message: text.to_owned(),
        channel: config.room.clone(),
        global: config.global,
        show_badge: true,
    }
}

/// Builder for [`Bot`].
///
/// Unless [`without_default_stages`](Self::without_default_stages) is
/// called, the transformer chain starts with HTML reduction and the filter
/// chain starts with the room check and command detection. Stages added here
/// run after those.
pub struct BotBuilder<T> {
    transport: T,
    name: String,
    config: ConfigHandle,
    registry: Arc<CommandRegistry>,
    settings: ParserSettings,
    default_stages: bool,
    transformers: Vec<BoxStage<ChatMessage, ChatMessage>>,
    filters: Vec<BoxStage<ChatMessage, ChatMessage>>,
    consumer: Option<BoxHandler<ChatMessage>>,
}

impl<T: Transport> BotBuilder<T> {
    /// Create a builder with default configuration and an empty registry.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            name: "chatpipe".to_owned(),
            config: ConfigHandle::default(),
            registry: Arc::new(CommandRegistry::new()),
            settings: ParserSettings::default(),
            default_stages: true,
            transformers: Vec::new(),
            filters: Vec::new(),
            consumer: None,
        }
    }

    /// Name used in log output.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Use `config`. Pass a [`ConfigHandle`] to keep a handle for later
    /// changes.
    pub fn config(mut self, config: impl Into<ConfigHandle>) -> Self {
        self.config = config.into();
        self
    }

    /// Use an existing registry.
    pub fn registry(mut self, registry: Arc<CommandRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Initial parser settings.
    pub fn parser_settings(mut self, settings: ParserSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Append a transformer.
    pub fn transformer<S>(mut self, stage: S) -> Self
    where
        S: Stage<ChatMessage, Output = ChatMessage>,
    {
        self.transformers.push(stage.boxed());
        self
    }

    /// Append a filter.
    pub fn filter<S>(mut self, stage: S) -> Self
    where
        S: Stage<ChatMessage, Output = ChatMessage>,
    {
        self.filters.push(stage.boxed());
        self
    }

    /// Drop the built-in transformers and filters.
    pub fn without_default_stages(mut self) -> Self {
        self.default_stages = false;
        self
    }

    /// Replace the default consumer.
    pub fn consumer<H>(mut self, consumer: H) -> Self
    where
        H: Handler<ChatMessage>,
        H::Output: IntoCommandResult,
    {
        self.consumer = Some(BoxHandler::new(consumer));
        self
    }

    /// Build the bot.
    pub fn build(self) -> Bot<T> {
        let parser =
            CommandParser::new(self.registry, self.config.clone()).with_settings(self.settings);

        let mut transformers: Vec<BoxStage<ChatMessage, ChatMessage>> = Vec::new();
        let mut filters: Vec<BoxStage<ChatMessage, ChatMessage>> = Vec::new();
        if self.default_stages {
            transformers.push(BoxStage::new(Logged::new(ReduceHtml, "reduce_html")));
            filters.push(BoxStage::new(Logged::new(
                RoomCheck::new(self.config.clone()),
                "room_check",
            )));
            filters.push(BoxStage::new(Logged::new(
                CommandFilter::new(parser.clone()),
                "is_command",
            )));
        }
        transformers.extend(self.transformers);
        filters.extend(self.filters);

        let consumer = self
            .consumer
            .unwrap_or_else(|| BoxHandler::new(parser.clone()));

        Bot {
            name: self.name,
            transport: self.transport,
            config: self.config,
            parser,
            transform: chain_all(transformers),
            filter: compose_all(filters),
            consumer,
        }
    }
}
