//! The message bus: drives one command to a prediction, or to nothing.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use common::DispatchId;

use crate::config::BusConfig;
use crate::error::{BusError, Result};
use crate::handler::CommandHandler;
use crate::messages::{Command, Error, Event, Message, Response};
use crate::translator::{MessageTranslator, Translate};

/// Single-threaded mediator between commands, handlers and the translator.
///
/// Each [`MessageBus::dispatch`] seeds a fresh work queue with one command and
/// drains it. An error re-queues the command that produced it behind the
/// remediation, so the command is retried once the remediation has run. An
/// event only queues its follow-up.
pub struct MessageBus<T = MessageTranslator> {
    translator: T,
    handler: CommandHandler,
    config: BusConfig,
    log: Vec<Message>,
}

impl MessageBus<MessageTranslator> {
    /// Creates a bus with the standard translator.
    pub fn with_handler(handler: CommandHandler) -> Self {
        Self::new(MessageTranslator::new(), handler)
    }
}

impl<T: Translate> MessageBus<T> {
    /// Creates a bus with default configuration.
    pub fn new(translator: T, handler: CommandHandler) -> Self {
        Self {
            translator,
            handler,
            config: BusConfig::default(),
            log: Vec::new(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: BusConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Returns every command, event and error seen by the last dispatch.
    ///
    /// The terminal prediction itself is returned, not logged.
    pub fn log(&self) -> &[Message] {
        &self.log
    }

    /// Takes the log of the last dispatch, leaving it empty.
    pub fn take_log(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.log)
    }

    /// Dispatches `command` and drives the work queue to completion.
    ///
    /// Returns `Some(prediction)` as soon as a handler yields
    /// [`Event::NewPrediction`], even if work is still queued, and `None` once
    /// the queue drains without one. Unhandled commands, untranslatable
    /// messages, exhausted retries and collaborator faults end the dispatch
    /// with an error; the log still shows how far it got.
    pub fn dispatch(&mut self, command: Command) -> Result<Option<f64>> {
        let dispatch_id = DispatchId::new();
        let span = tracing::info_span!("dispatch", %dispatch_id, command = command.name());
        let _entered = span.enter();

        metrics::counter!("bus_dispatches_total").increment(1);
        let started = Instant::now();

        self.log.clear();
        let outcome = self.drain(command);

        metrics::histogram!("bus_dispatch_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        let label = match &outcome {
            Ok(Some(_)) => "prediction",
            Ok(None) => "no_result",
            Err(_) => "failed",
        };
        metrics::counter!("bus_dispatch_outcomes_total", "outcome" => label).increment(1);

        match &outcome {
            Ok(_) => tracing::debug!(logged = self.log.len(), outcome = label, "dispatch finished"),
            Err(err) => tracing::error!(error = %err, logged = self.log.len(), "dispatch failed"),
        }
        outcome
    }

    fn drain(&mut self, command: Command) -> Result<Option<f64>> {
        let mut queue = VecDeque::from([command]);
        let mut seen_errors: HashMap<Error, u32> = HashMap::new();

        while let Some(current) = queue.pop_front() {
            self.log.push(current.clone().into());
            metrics::counter!("bus_commands_handled_total", "command" => current.name())
                .increment(1);
            tracing::debug!(command = %current, "handling command");

            let Some(response) = self.handler.handle(&current)? else {
                continue;
            };

            if let Response::Event(Event::NewPrediction { prediction }) = response {
                tracing::info!(prediction, "prediction resolved");
                return Ok(Some(prediction));
            }

            self.log.push(response.clone().into());
            let next = self.translator.next_command(&response)?;

            match response {
                Response::Error(error) => {
                    let occurrences = seen_errors.entry(error.clone()).or_default();
                    *occurrences += 1;
                    if self.config.exhausted(*occurrences) {
                        return Err(BusError::RetryLimitExceeded {
                            error,
                            occurrences: *occurrences,
                        });
                    }

                    tracing::warn!(
                        %error,
                        remediation = next.name(),
                        retry = current.name(),
                        "remediating before retry"
                    );
                    metrics::counter!("bus_error_retries_total", "error" => error.name())
                        .increment(1);
                    queue.push_front(current);
                    queue.push_front(next);
                }
                Response::Event(event) => {
                    tracing::debug!(%event, next = next.name(), "continuing");
                    queue.push_front(next);
                }
            }
        }

        Ok(None)
    }
}

impl<T> std::fmt::Debug for MessageBus<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageBus")
            .field("handler", &self.handler)
            .field("config", &self.config)
            .field("logged", &self.log.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::CommandKind;
    use common::UseCase;

    fn model_not_found() -> Error {
        Error::ModelNotFound {
            use_case: UseCase::new("u"),
        }
    }

    #[test]
    fn test_log_is_scoped_to_one_dispatch() {
        let handler = CommandHandler::new().with_handler(CommandKind::GetPrediction, |_| {
            Ok(Some(Event::NewPrediction { prediction: 1.0 }.into()))
        });
        let mut bus = MessageBus::with_handler(handler);

        bus.dispatch(Command::get_prediction("u", "1")).unwrap();
        bus.dispatch(Command::get_prediction("u", "2")).unwrap();

        assert_eq!(bus.log(), &[Message::from(Command::get_prediction("u", "2"))]);
    }

    #[test]
    fn test_write_only_handler_drains_queue() {
        let handler = CommandHandler::new().with_handler(CommandKind::TrainModel, |_| Ok(None));
        let mut bus = MessageBus::with_handler(handler);

        let result = bus.dispatch(Command::train_model("u")).unwrap();

        assert_eq!(result, None);
        assert_eq!(bus.take_log(), vec![Message::from(Command::train_model("u"))]);
        assert!(bus.log().is_empty());
    }

    #[test]
    fn test_zero_retries_fails_on_first_error() {
        let handler = CommandHandler::new()
            .with_handler(CommandKind::GetPrediction, |_| Ok(Some(model_not_found().into())));
        let mut bus =
            MessageBus::with_handler(handler).with_config(BusConfig::with_max_retries(0));

        let err = bus.dispatch(Command::get_prediction("u", "1")).unwrap_err();

        assert!(matches!(
            err,
            BusError::RetryLimitExceeded { occurrences: 1, .. }
        ));
        assert_eq!(
            bus.log(),
            &[
                Message::from(Command::get_prediction("u", "1")),
                Message::from(model_not_found()),
            ]
        );
    }

    #[test]
    fn test_untranslatable_response_is_fatal() {
        let handler = CommandHandler::new().with_handler(CommandKind::TrainModel, |_| {
            Ok(Some(model_not_found().into()))
        });
        let refuse = |response: &Response| -> Result<Command> {
            Err(BusError::UntranslatableMessage {
                message: response.name(),
            })
        };
        let mut bus = MessageBus::new(refuse, handler);

        let err = bus.dispatch(Command::train_model("u")).unwrap_err();

        assert!(matches!(
            err,
            BusError::UntranslatableMessage {
                message: "ModelNotFound"
            }
        ));
        assert_eq!(bus.log().len(), 2);
    }
}
