//! Orchestration kernel for the prediction pipeline.
//!
//! A caller hands one [`Command`] to the [`MessageBus`], which:
//! 1. pops the next command from a per-dispatch work queue and logs it
//! 2. runs it through the [`CommandHandler`] registry
//! 3. returns at once if the handler produced a prediction
//! 4. otherwise logs the event or error and asks the [`Translate`] policy for
//!    the follow-up command; after an error the original command is retried
//!    once the follow-up has run
//!
//! Missing models and features are therefore provisioned lazily, on the way
//! to a prediction.

pub mod bus;
pub mod config;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod messages;
pub mod translator;
pub mod wiring;

pub use bus::MessageBus;
pub use config::BusConfig;
pub use error::{BusError, Result};
pub use handler::{CommandHandler, HandlerFn};
pub use messages::{Command, CommandKind, Event, Message, Response};
pub use translator::{MessageTranslator, Translate};
pub use wiring::Collaborators;
