//! # Stage Layer
//!
//! A stage inspects a borrowed value and either yields an output, yields
//! nothing, or fails. Yielding nothing is a veto: the record is dropped
//! without an error.
//!
//! # Composition
//!
//! Two compositions exist because transformers and filters need different
//! things from a chain:
//!
//! - [`Chain`] threads values. The second stage sees the first stage's
//!   output. Transformer lists are folded this way by [`chain_all`].
//! - [`MaybeCompose`] gates values. The guard runs first, and only if it
//!   yields something does the outer stage run, on the **original** input.
//!   Filter lists are folded this way by [`compose_all`].
//!
//! Both fail fast: the first error or veto ends evaluation.

use crate::{error::BoxError, message::Message};

/// A synchronous pipeline step.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Stage` for `{In}`",
    label = "missing `Stage` implementation",
    note = "Stages must implement the `apply` method to process `{In}`."
)]
pub trait Stage<In: Message>: Send + Sync + 'static {
    /// The value this stage passes downstream.
    type Output: Message;

    /// Inspects the input and produces the output, if any.
    ///
    /// `Ok(None)` drops the value; `Err` drops it and reports why.
    fn apply(&self, input: &In) -> Result<Option<Self::Output>, BoxError>;

    /// Feeds this stage's output into `next`.
    fn and_then<Next>(self, next: Next) -> Chain<Self, Next>
    where
        Self: Sized,
        Next: Stage<Self::Output>,
    {
        Chain {
            first: self,
            second: next,
        }
    }

    /// Runs `guard` first and applies this stage to the original input only
    /// if the guard yielded something.
    fn guarded_by<G>(self, guard: G) -> MaybeCompose<Self, G>
    where
        Self: Sized,
        G: Stage<In>,
    {
        MaybeCompose::new(self, guard)
    }

    /// Boxes the stage.
    fn boxed(self) -> BoxStage<In, Self::Output>
    where
        Self: Sized,
    {
        BoxStage::new(self)
    }
}

/// Passes every input through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Identity;

impl<E: Message + Clone> Stage<E> for Identity {
    type Output = E;

    fn apply(&self, input: &E) -> Result<Option<E>, BoxError> {
        Ok(Some(input.clone()))
    }
}

/// An absent stage vetoes everything.
impl<S, In> Stage<In> for Option<S>
where
    In: Message,
    S: Stage<In>,
{
    type Output = S::Output;

    fn apply(&self, input: &In) -> Result<Option<Self::Output>, BoxError> {
        match self {
            Some(stage) => stage.apply(input),
            None => Ok(None),
        }
    }
}

/// Two stages run in sequence, the second consuming the first's output.
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B, In> Stage<In> for Chain<A, B>
where
    In: Message,
    A: Stage<In>,
    B: Stage<A::Output>,
{
    type Output = B::Output;

    fn apply(&self, input: &In) -> Result<Option<Self::Output>, BoxError> {
        let Some(intermediate) = self.first.apply(input)? else {
            return Ok(None);
        };
        self.second.apply(&intermediate)
    }
}

/// Maybe-composition of two stages.
///
/// `inner` is evaluated first. If it yields nothing so does the
/// composition; otherwise `outer` is applied to the same input `inner` saw.
pub struct MaybeCompose<F, G> {
    outer: F,
    inner: G,
}

impl<F, G> MaybeCompose<F, G> {
    /// Compose `outer` after `inner`.
    pub fn new(outer: F, inner: G) -> Self {
        Self { outer, inner }
    }
}

impl<F, G, In> Stage<In> for MaybeCompose<F, G>
where
    In: Message,
    F: Stage<In>,
    G: Stage<In>,
{
    type Output = F::Output;

    fn apply(&self, input: &In) -> Result<Option<Self::Output>, BoxError> {
        if self.inner.apply(input)?.is_none() {
            return Ok(None);
        }
        self.outer.apply(input)
    }
}

/// A type-erased stage.
pub struct BoxStage<In, Out> {
    inner: Box<dyn Stage<In, Output = Out>>,
}

impl<In, Out> BoxStage<In, Out>
where
    In: Message,
    Out: Message,
{
    /// Box a stage.
    pub fn new<S>(stage: S) -> Self
    where
        S: Stage<In, Output = Out>,
    {
        Self {
            inner: Box::new(stage),
        }
    }
}

impl<In, Out> Stage<In> for BoxStage<In, Out>
where
    In: Message,
    Out: Message,
{
    type Output = Out;

    fn apply(&self, input: &In) -> Result<Option<Out>, BoxError> {
        self.inner.apply(input)
    }

    fn boxed(self) -> BoxStage<In, Out> {
        self
    }
}

/// Folds gatekeeping stages left to right into one, starting from
/// [`Identity`].
///
/// Stages are evaluated in list order and every one of them sees the
/// original input. The result is the last stage's output, which for pure
/// filters is the input itself. An empty list accepts everything.
pub fn compose_all<E, I>(stages: I) -> BoxStage<E, E>
where
    E: Message + Clone,
    I: IntoIterator<Item = BoxStage<E, E>>,
{
    let identity: BoxStage<E, E> = BoxStage::new(Identity);
    stages
        .into_iter()
        .fold(identity, |acc, stage| BoxStage::new(stage.guarded_by(acc)))
}

/// Folds rewriting stages left to right into one, threading each output
/// into the next stage.
pub fn chain_all<E, I>(stages: I) -> BoxStage<E, E>
where
    E: Message + Clone,
    I: IntoIterator<Item = BoxStage<E, E>>,
{
    let identity: BoxStage<E, E> = BoxStage::new(Identity);
    stages
        .into_iter()
        .fold(identity, |acc, stage| BoxStage::new(acc.and_then(stage)))
}
