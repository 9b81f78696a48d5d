//! Command handler registry.

use std::collections::HashMap;
use std::fmt;

use crate::error::{BusError, Result};
use crate::messages::{Command, CommandKind, Response};

/// A handler bound to one command kind.
///
/// Returns the event or error the command produced, or `None` when the command
/// was a plain write with nothing further to report.
pub type HandlerFn = Box<dyn FnMut(&Command) -> Result<Option<Response>>>;

/// Routes each command to the handler registered for its kind.
///
/// Handlers own their side effects; the registry only looks them up.
#[derive(Default)]
pub struct CommandHandler {
    handlers: HashMap<CommandKind, HandlerFn>,
}

impl CommandHandler {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `handler` to `kind`, replacing any earlier binding.
    pub fn register<F>(&mut self, kind: CommandKind, handler: F) -> &mut Self
    where
        F: FnMut(&Command) -> Result<Option<Response>> + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    /// Builder form of [`CommandHandler::register`].
    pub fn with_handler<F>(mut self, kind: CommandKind, handler: F) -> Self
    where
        F: FnMut(&Command) -> Result<Option<Response>> + 'static,
    {
        self.register(kind, handler);
        self
    }

    /// Runs the handler registered for the command's kind.
    pub fn handle(&mut self, command: &Command) -> Result<Option<Response>> {
        let kind = command.kind();
        let handler = self
            .handlers
            .get_mut(&kind)
            .ok_or(BusError::UnhandledCommand(kind))?;
        handler(command)
    }

    /// Returns true if a handler is bound to `kind`.
    pub fn is_registered(&self, kind: CommandKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Returns the kinds without a handler, in declaration order.
    pub fn missing_kinds(&self) -> Vec<CommandKind> {
        CommandKind::ALL
            .into_iter()
            .filter(|kind| !self.is_registered(*kind))
            .collect()
    }
}

impl fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<CommandKind> = CommandKind::ALL
            .into_iter()
            .filter(|kind| self.is_registered(*kind))
            .collect();
        f.debug_struct("CommandHandler")
            .field("registered", &registered)
            .finish()
    }
}
