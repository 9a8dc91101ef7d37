//! # Handler Layer
//!
//! Handlers are the asynchronous endpoints of the pipeline. The engine's
//! consumer is a `Handler<ChatMessage>`; every registered command is a
//! `Handler<Invocation>`.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|inv: Invocation| async move { inv.rest() }`
//! 2. **Struct implementation**: `impl Handler<Invocation> for Roll`
//! 3. **Erased**: [`BoxHandler`] for registries and builder slots

use crate::{
    error::BoxError,
    message::{ChatMessage, Message},
    response::{CommandResult, IntoCommandResult},
};
use std::{future::Future, pin::Pin};

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A marker trait for the result of a handler.
pub trait HandlerResult: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> HandlerResult for T {}

/// The arguments a command handler is called with.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// The triggering record with the command prefix removed.
    pub message: ChatMessage,
    /// Positional arguments: the tokens after the command name, followed by
    /// any value threaded in from a previous pipe stage.
    pub args: Vec<String>,
}

impl Message for Invocation {}

impl Invocation {
    /// Positional argument `index`, if present.
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// All arguments joined back with single spaces.
    pub fn rest(&self) -> String {
        self.args.join(" ")
    }

    /// The room the command was issued in.
    pub fn channel(&self) -> &str {
        &self.message.channel
    }
}

/// The terminal endpoint of the pipeline.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle input of type `{In}`",
    label = "missing `Handler<{In}>` implementation",
    note = "Handlers must implement the `call` method for the input type `{In}`."
)]
pub trait Handler<In: Message>: Send + Sync + 'static {
    /// The output type of the handler, converted by the engine through
    /// [`IntoCommandResult`].
    type Output: HandlerResult;

    /// Executes the handler logic.
    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send;
}

// Blanket impl for closures
impl<F, In, Out, Fut> Handler<In> for F
where
    In: Message,
    Out: HandlerResult,
    F: Fn(In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Out> + Send,
{
    type Output = Out;

    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send {
        (self)(input)
    }
}

/// Object-safe version of [`Handler`] with the output already converted.
pub trait DynHandler<In>: Send + Sync + 'static {
    /// Executes the handler and converts its output.
    fn call_dyn(&self, input: In) -> BoxFuture<'_, Result<CommandResult, BoxError>>;
}

impl<H, In> DynHandler<In> for H
where
    In: Message,
    H: Handler<In>,
    H::Output: IntoCommandResult,
{
    fn call_dyn(&self, input: In) -> BoxFuture<'_, Result<CommandResult, BoxError>> {
        Box::pin(async move { self.call(input).await.into_command_result() })
    }
}

/// A type-erased handler.
pub struct BoxHandler<In> {
    inner: Box<dyn DynHandler<In>>,
}

impl<In: Message> BoxHandler<In> {
    /// Box a handler.
    pub fn new<H>(handler: H) -> Self
    where
        H: Handler<In>,
        H::Output: IntoCommandResult,
    {
        Self {
            inner: Box::new(handler),
        }
    }
}

impl<In: Message> Handler<In> for BoxHandler<In> {
    type Output = Result<CommandResult, BoxError>;

    fn call(&self, input: In) -> impl Future<Output = Self::Output> + Send {
        self.inner.call_dyn(input)
    }
}
