//! Testing utilities for chatpipe.
//!
//! - [`RecordingTransport`]: a transport that records connections and sends
//! - [`SpyStage`]: a stage that records inputs and can be told what to return
//! - [`CountingHandler`]: a handler that counts calls and returns a fixed result

use chatpipe_core::{
    BoxError, CommandResult, Handler, Message, OutboundMessage, Stage, Transport,
};
use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Recording Transport
// ============================================================================

/// A transport that records everything the bot asks of it.
///
/// Clones share the same recordings.
///
/// # Example
///
/// ```rust,ignore
/// let transport = RecordingTransport::new();
/// let bot = Bot::builder(transport.clone()).build();
///
/// bot.send("hi");
/// assert_eq!(transport.sent()[0].message, "hi");
/// ```
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    connections: Arc<Mutex<Vec<(String, Option<String>)>>>,
    init_error: Arc<Mutex<Option<String>>>,
    viewers: Arc<Mutex<Vec<String>>>,
}

impl RecordingTransport {
    /// Create a transport that accepts every connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `init` fail with `error`.
    pub fn fail_init(&self, error: impl Into<String>) {
        *lock(&self.init_error) = Some(error.into());
    }

    /// Set what `channel_viewers` reports.
    pub fn set_viewers(&self, viewers: Vec<String>) {
        *lock(&self.viewers) = viewers;
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        lock(&self.sent).clone()
    }

    /// Bodies of the messages sent so far, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        lock(&self.sent).iter().map(|m| m.message.clone()).collect()
    }

    /// `(room, credentials)` of every `init` call.
    pub fn connections(&self) -> Vec<(String, Option<String>)> {
        lock(&self.connections).clone()
    }

    /// Forget all recorded sends.
    pub fn clear(&self) {
        lock(&self.sent).clear();
    }
}

impl Transport for RecordingTransport {
    async fn init(&self, room: &str, credentials: Option<&str>) -> Result<(), BoxError> {
        lock(&self.connections).push((room.to_owned(), credentials.map(str::to_owned)));
        match lock(&self.init_error).clone() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    fn send_message(&self, outbound: OutboundMessage) {
        lock(&self.sent).push(outbound);
    }

    fn channel_viewers(&self) -> Vec<String> {
        lock(&self.viewers).clone()
    }
}

// ============================================================================
// Spy Stage
// ============================================================================

/// A stage that records its inputs and returns a programmed verdict.
///
/// By default it passes every input through unchanged.
pub struct SpyStage<E: Clone> {
    inputs: Arc<Mutex<Vec<E>>>,
    verdict: Arc<Mutex<Verdict>>,
}

#[derive(Clone)]
enum Verdict {
    Pass,
    Veto,
    Fail(String),
}

impl<E: Clone> SpyStage<E> {
    /// Create a spy that passes everything.
    pub fn new() -> Self {
        Self {
            inputs: Arc::new(Mutex::new(Vec::new())),
            verdict: Arc::new(Mutex::new(Verdict::Pass)),
        }
    }

    /// Pass inputs through.
    pub fn pass(&self) {
        *lock(&self.verdict) = Verdict::Pass;
    }

    /// Veto every input.
    pub fn veto(&self) {
        *lock(&self.verdict) = Verdict::Veto;
    }

    /// Fail every input with `error`.
    pub fn fail(&self, error: impl Into<String>) {
        *lock(&self.verdict) = Verdict::Fail(error.into());
    }

    /// Recorded inputs.
    pub fn inputs(&self) -> Vec<E> {
        lock(&self.inputs).clone()
    }

    /// Number of times `apply` was called.
    pub fn call_count(&self) -> usize {
        lock(&self.inputs).len()
    }
}

impl<E: Clone> Default for SpyStage<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> Clone for SpyStage<E> {
    fn clone(&self) -> Self {
        Self {
            inputs: self.inputs.clone(),
            verdict: self.verdict.clone(),
        }
    }
}

impl<E: Message + Clone> Stage<E> for SpyStage<E> {
    type Output = E;

    fn apply(&self, input: &E) -> Result<Option<E>, BoxError> {
        lock(&self.inputs).push(input.clone());
        match lock(&self.verdict).clone() {
            Verdict::Pass => Ok(Some(input.clone())),
            Verdict::Veto => Ok(None),
            Verdict::Fail(error) => Err(error.into()),
        }
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations and returns a fixed result.
#[derive(Clone)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
    result: CommandResult,
}

impl CountingHandler {
    /// A counting handler that stays silent.
    pub fn new() -> Self {
        Self::returning(CommandResult::Silent)
    }

    /// A counting handler that returns `result` on every call.
    pub fn returning(result: CommandResult) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            result,
        }
    }

    /// Number of calls so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Default for CountingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Message> Handler<E> for CountingHandler {
    type Output = CommandResult;

    async fn call(&self, _input: E) -> Self::Output {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}
