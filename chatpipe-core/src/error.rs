//! Error types for chatpipe.
//!
//! - [`ChatpipeError`] - Why a single record was dropped
//! - [`StageError`] - Errors raised by transformers and filters
//! - [`CommandError`] - Errors raised while running a command

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error for processing one record.
///
/// The engine logs these and moves on to the next record.
#[derive(Error, Debug)]
pub enum ChatpipeError {
    /// A transformer or filter failed.
    #[error("stage error: {0}")]
    Stage(#[source] BoxError),

    /// The consumer failed.
    #[error("consumer error: {0}")]
    Consumer(#[source] BoxError),
}

/// Errors raised by transformers and filters.
#[derive(Error, Debug)]
pub enum StageError {
    /// The input could not be interpreted.
    #[error("{stage}: malformed input: {reason}")]
    Malformed {
        /// Name of the failing stage.
        stage: &'static str,
        /// What was wrong.
        reason: String,
    },
}

/// Errors raised while running a command.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command's handler returned an error.
    #[error("command `{name}` failed: {source}")]
    Handler {
        /// Command name.
        name: String,
        /// The handler's error.
        #[source]
        source: BoxError,
    },
}
