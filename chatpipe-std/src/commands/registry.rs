//! Command registry.

use chatpipe_core::{
    BoxError, BoxHandler, CommandResult, Handler, IntoCommandResult, Invocation,
};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// Registration options for a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOptions {
    /// Extra trigger recognised alongside the parser's default prefixes.
    pub prefix: Option<String>,
    /// When `false`, the command only runs in the home room.
    pub global: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            global: true,
        }
    }
}

impl CommandOptions {
    /// Global command, default prefixes only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognise `prefix` as an additional trigger.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Restrict the command to the home room.
    pub fn scoped(mut self) -> Self {
        self.global = false;
        self
    }
}

/// A registered command.
pub struct CommandEntry {
    name: String,
    handler: BoxHandler<Invocation>,
    prefix: Option<String>,
    global: bool,
}

impl CommandEntry {
    /// The name the command is looked up by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command's custom prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Whether the command runs outside the home room.
    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Run the handler.
    pub async fn invoke(&self, invocation: Invocation) -> Result<CommandResult, BoxError> {
        self.handler.call(invocation).await
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("prefix", &self.prefix)
            .field("global", &self.global)
            .finish_non_exhaustive()
    }
}

/// Name → command mapping, shared and mutable at runtime.
///
/// Registering a name that already exists replaces the earlier entry.
#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<HashMap<String, Arc<CommandEntry>>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command, returning the entry it replaced.
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
        let name = name.into();
        let entry = Arc::new(CommandEntry {
            name: name.clone(),
            handler: BoxHandler::new(handler),
            prefix: options.prefix,
            global: options.global,
        });
        let replaced = self.write().insert(name, entry);
        if let Some(old) = &replaced {
            tracing::debug!(command = old.name(), "replaced existing command");
        }
        replaced
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_command<H>(self, name: impl Into<String>, handler: H, options: CommandOptions) -> Self
    where
        H: Handler<Invocation>,
        H::Output: IntoCommandResult,
    {
        self.register(name, handler, options);
        self
    }

    /// Remove a command.
    pub fn unregister(&self, name: &str) -> Option<Arc<CommandEntry>> {
        self.write().remove(name)
    }

    /// Find a command by name.
    pub fn lookup(&self, name: &str) -> Option<Arc<CommandEntry>> {
        self.read().get(name).cloned()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Custom prefixes of all registered commands.
    pub fn custom_prefixes(&self) -> Vec<String> {
        self.read()
            .values()
            .filter_map(|entry| entry.prefix.clone())
            .collect()
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<CommandEntry>>> {
        self.commands.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<CommandEntry>>> {
        self.commands.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .finish()
    }
}
