//! Runner for the prediction pipeline.
//!
//! Seeds the collaborators, wires them into a [`MessageBus`] and dispatches a
//! single command chosen by [`Config`].

pub mod config;
pub mod error;
pub mod seed;

use orchestration::{Command, Message, MessageBus};

pub use config::{AppCommand, Config, LogFormat};
pub use error::{AppError, Result};
pub use seed::{AppCollaborators, Seed};

/// What one run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The command that was dispatched.
    pub command: Command,

    /// The prediction, if the dispatch resolved one.
    pub prediction: Option<f64>,

    /// Every message the dispatch logged.
    pub log: Vec<Message>,
}

/// Builds the command described by the configuration.
pub fn command_for(config: &Config) -> Command {
    match config.command {
        AppCommand::Predict => {
            Command::get_prediction(config.use_case.clone(), config.user_id.clone())
        }
        AppCommand::Train => Command::train_model(config.use_case.clone()),
    }
}

/// Loads the configured seed, or the demo seed when none is set.
pub fn load_seed(config: &Config) -> Result<Seed> {
    match &config.seed_path {
        Some(path) => Seed::from_path(path),
        None => Seed::demo(),
    }
}

/// Runs the configured command against the configured seed.
pub fn run(config: &Config) -> Result<Outcome> {
    let seed = load_seed(config)?;
    run_with_seed(config, seed)
}

/// Runs the configured command against an explicit seed.
#[tracing::instrument(skip_all, fields(command = ?config.command, use_case = %config.use_case))]
pub fn run_with_seed(config: &Config, seed: Seed) -> Result<Outcome> {
    let handler = seed.into_collaborators().into_command_handler();
    let mut bus = MessageBus::with_handler(handler).with_config(config.bus);
    let command = command_for(config);
    metrics::counter!("app_runs_total", "command" => config.command.as_str()).increment(1);

    match bus.dispatch(command.clone()) {
        Ok(prediction) => Ok(Outcome {
            command,
            prediction,
            log: bus.take_log(),
        }),
        Err(source) => Err(AppError::Dispatch {
            source,
            log: bus.take_log(),
        }),
    }
}

/// Renders a dispatch log as JSON lines.
pub fn render_log(log: &[Message]) -> Result<Vec<String>> {
    log.iter()
        .map(|message| serde_json::to_string(message).map_err(AppError::from))
        .collect()
}

/// Renders the final result line.
pub fn render_prediction(prediction: Option<f64>) -> String {
    match prediction {
        Some(value) => format!("prediction: {value}"),
        None => "no result".to_string(),
    }
}
