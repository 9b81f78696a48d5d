//! Bus error types.

use services::ServiceError;
use thiserror::Error;

use crate::messages::{self, CommandKind};

/// Fatal failures of a dispatch.
///
/// Recoverable domain failures never show up here: they travel as
/// [`messages::Error`] values and drive the retry path instead.
#[derive(Debug, Error)]
pub enum BusError {
    /// No handler is registered for the command's kind.
    #[error("No handler exists for command: {0}")]
    UnhandledCommand(CommandKind),

    /// A handler was invoked with a command of another kind.
    #[error("Handler for {expected} received a {actual} command")]
    HandlerMismatch {
        expected: CommandKind,
        actual: CommandKind,
    },

    /// The translator has no follow-up command for the message.
    #[error("No command available for message: {message}")]
    UntranslatableMessage { message: &'static str },

    /// The same error kept coming back after its remediation ran.
    #[error("Error {error} occurred {occurrences} times; remediation did not resolve it")]
    RetryLimitExceeded {
        error: messages::Error,
        occurrences: u32,
    },

    /// A collaborator failed in a way no message models.
    #[error("Collaborator error: {0}")]
    Collaborator(#[from] ServiceError),
}

/// Convenience type alias for bus results.
pub type Result<T> = std::result::Result<T, BusError>;
