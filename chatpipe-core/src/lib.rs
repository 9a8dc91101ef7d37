//! # chatpipe-core
//!
//! Core traits for the chatpipe chat bot message pipeline.
//!
//! This crate has minimal dependencies and is meant to be imported by command
//! crates and transports that don't need the standard implementations in
//! `chatpipe-std`.
//!
//! # Three-Layer Architecture
//!
//! ## Layer 1: Records ([`Message`], [`ChatMessage`])
//!
//! The data flowing through the pipeline. Records are values: a stage that
//! rewrites a message returns a new record instead of mutating the one it
//! was given.
//!
//! ## Layer 2: Stages ([`Stage`])
//!
//! Synchronous, borrowing steps that either yield a value, yield nothing
//! (veto) or fail. Transformers and filters are both stages.
//!
//! - **Threading**: [`Chain`] feeds one stage's output into the next
//! - **Gatekeeping**: [`MaybeCompose`] lets a guard veto before the outer
//!   stage sees the *original* input
//! - **Folding**: [`compose_all`] and [`chain_all`] reduce a stage list
//!   into one stage starting from [`Identity`]
//!
//! ## Layer 3: Handlers ([`Handler`])
//!
//! Asynchronous terminal endpoints. Consumers and command handlers are both
//! handlers; their output converts into a [`CommandResult`] that tells the
//! engine whether, and where, to reply.
//!
//! # Collaborators
//!
//! [`Transport`] is the seam to the chat network client. The core only needs
//! it to connect once and accept outbound messages.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod handler;
mod message;
mod response;
mod stage;
mod transport;

// Re-exports
pub use error::{BoxError, ChatpipeError, CommandError, StageError};
pub use handler::{BoxFuture, BoxHandler, DynHandler, Handler, HandlerResult, Invocation};
pub use message::{ChatMessage, Message};
pub use response::{CommandResult, IntoCommandResult};
pub use stage::{BoxStage, Chain, Identity, MaybeCompose, Stage, chain_all, compose_all};
pub use transport::{OutboundMessage, Transport};
