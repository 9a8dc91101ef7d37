//! Closure-backed stages.

use chatpipe_core::{BoxError, Message, Stage};

/// A stage built from a function that may veto.
///
/// # Example
///
/// ```rust
/// use chatpipe_core::{ChatMessage, Stage};
/// use chatpipe_std::stages::FnStage;
///
/// let shout = FnStage::new(|m: &ChatMessage| Some(m.with_message(m.message.to_uppercase())));
/// let out = shout.apply(&ChatMessage::new("alpha", "hi")).unwrap().unwrap();
/// assert_eq!(out.message, "HI");
/// ```
pub struct FnStage<F> {
    mapper: F,
}

impl<F> FnStage<F> {
    /// Create a new closure stage.
    pub fn new(mapper: F) -> Self {
        Self { mapper }
    }
}

impl<In, Out, F> Stage<In> for FnStage<F>
where
    In: Message,
    Out: Message,
    F: Fn(&In) -> Option<Out> + Send + Sync + 'static,
{
    type Output = Out;

    fn apply(&self, input: &In) -> Result<Option<Out>, BoxError> {
        Ok((self.mapper)(input))
    }
}

/// A filter built from a predicate. Passes a clone of the input through.
pub struct Predicate<F> {
    predicate: F,
}

impl<F> Predicate<F> {
    /// Create a new predicate filter.
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> Stage<E> for Predicate<F>
where
    E: Message + Clone,
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    type Output = E;

    fn apply(&self, input: &E) -> Result<Option<E>, BoxError> {
        Ok((self.predicate)(input).then(|| input.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatpipe_core::ChatMessage;

    #[test]
    fn predicate_passes_input_through() {
        let long = Predicate::new(|m: &ChatMessage| m.message.len() > 3);

        let kept = ChatMessage::new("alpha", "hello");
        assert_eq!(long.apply(&kept).unwrap(), Some(kept.clone()));
        assert_eq!(long.apply(&ChatMessage::new("alpha", "hi")).unwrap(), None);
    }

    #[test]
    fn fn_stage_can_veto() {
        let strip = FnStage::new(|m: &ChatMessage| {
            m.message
                .strip_prefix('>')
                .map(|rest| m.with_message(rest.trim_start()))
        });

        let quoted = strip.apply(&ChatMessage::new("alpha", "> hi")).unwrap();
        assert_eq!(quoted.map(|m| m.message), Some("hi".to_string()));
        assert_eq!(strip.apply(&ChatMessage::new("alpha", "hi")).unwrap(), None);
    }
}
