//! # chatpipe - Chat Bot Message Pipeline
//!
//! `chatpipe` turns a stream of raw chat messages into bot commands and
//! replies. Incoming HTML is reduced to plain text, filtered by room and
//! command prefix, and handed to a consumer (by default the command parser,
//! which supports unix-like `|` pipes between commands).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use chatpipe::prelude::*;
//!
//! let bot = Bot::builder(my_transport)
//!     .config(BotConfig { room: "lobby".into(), ..BotConfig::default() })
//!     .build();
//!
//! bot.register("echo", |inv: Invocation| async move { inv.rest() }, CommandOptions::new());
//! bot.register("upper", |inv: Invocation| async move { inv.rest().to_uppercase() }, CommandOptions::new());
//!
//! // "!upper hi | !echo" replies "HI" in the lobby
//! bot.start(incoming_batches).await?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bot;
pub mod logging;
pub mod settings;

pub use bot::{Bot, BotBuilder, BotError};

pub use chatpipe_core::{
    BoxError, BoxHandler, BoxStage, Chain, ChatMessage, ChatpipeError, CommandError,
    CommandResult, Handler, Identity, IntoCommandResult, Invocation, MaybeCompose, Message,
    OutboundMessage, Stage, StageError, Transport, chain_all, compose_all,
};

pub use chatpipe_std::{
    commands::{CommandEntry, CommandOptions, CommandParser, CommandRegistry, ParserSettings},
    config::{BotConfig, ConfigHandle},
    filters::{CommandFilter, RoomCheck},
    html::ReduceHtml,
};

/// Stage helpers.
pub mod stages {
    pub use chatpipe_std::{
        logging::Logged,
        stages::{FnStage, Predicate},
    };
}

/// Testing utilities.
pub mod testing {
    pub use chatpipe_std::testing::{CountingHandler, RecordingTransport, SpyStage};
}

/// Prelude module - common imports for chatpipe.
///
/// # Usage
///
/// ```rust,ignore
/// use chatpipe::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Bot, BotConfig, BotError, ChatMessage, CommandOptions, CommandResult, ConfigHandle,
        Handler, Invocation, Stage, Transport,
    };
}
