//! Logging wrapper for stage observation.

use chatpipe_core::{BoxError, Message, Stage};

/// A stage wrapper that reports the inner stage's verdict via `tracing`.
///
/// Passing is logged at `trace`, vetoes at `debug` and failures at `warn`.
pub struct Logged<S> {
    inner: S,
    name: &'static str,
}

impl<S> Logged<S> {
    /// Wrap `inner`, naming it `name` in log output.
    pub const fn new(inner: S, name: &'static str) -> Self {
        Self { inner, name }
    }

    /// The stage name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<S, In> Stage<In> for Logged<S>
where
    In: Message,
    S: Stage<In>,
{
    type Output = S::Output;

    fn apply(&self, input: &In) -> Result<Option<Self::Output>, BoxError> {
        let verdict = self.inner.apply(input);
        match &verdict {
            Ok(Some(_)) => tracing::trace!(stage = self.name, "passed"),
            Ok(None) => tracing::debug!(stage = self.name, "vetoed"),
            Err(error) => tracing::warn!(stage = self.name, %error, "failed"),
        }
        verdict
    }
}
