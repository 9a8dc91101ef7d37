//! # chatpipe-std
//!
//! Standard implementations for the chatpipe message pipeline.
//!
//! This crate provides:
//! - **Configuration**: [`ConfigHandle`](config::ConfigHandle), a live, shared view of the bot settings
//! - **Transformers**: [`ReduceHtml`](html::ReduceHtml)
//! - **Filters**: [`RoomCheck`](filters::RoomCheck), [`CommandFilter`](filters::CommandFilter)
//! - **Commands**: [`CommandRegistry`](commands::CommandRegistry), [`CommandParser`](commands::CommandParser)
//! - **Stage helpers**: closure stages and the [`Logged`](logging::Logged) wrapper
//! - **Testing**: recording transport, spy stage, counting handler

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use chatpipe_core;

// Modules
pub mod commands;
pub mod config;
pub mod filters;
pub mod html;
pub mod logging;
pub mod stages;
pub mod testing;
