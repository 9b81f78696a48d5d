//! Commands, events and errors exchanged on the message bus.
//!
//! Commands say what to do, events say what happened, errors say what went
//! wrong in a way that has a known remediation. All three are closed enums, so
//! the handler registry and the translator can be checked for totality.

use std::fmt;

use common::{FeatureSet, TrainingData, UseCase, UserId};
use domain::Model;
use serde::{Deserialize, Serialize};

/// An imperative instruction for the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Command {
    /// Predict for one user under a use-case.
    GetPrediction { use_case: UseCase, user_id: UserId },

    /// Pull the registry model of a use-case towards inference.
    PublishModelForInference { use_case: UseCase },

    /// Store a model in the inference-side repository.
    AddModelForInference { use_case: UseCase, model: Model },

    /// Pull the current features of a use-case towards inference.
    PublishInferenceFeatures { use_case: UseCase },

    /// Store a feature set in the inference-side repository.
    AddFeaturesForInference {
        use_case: UseCase,
        feature_set: FeatureSet,
    },

    /// Train the model of a use-case.
    TrainModel { use_case: UseCase },

    /// Store a trained model in the registry.
    AddModelToRegistry { use_case: UseCase, model: Model },

    /// Pull historical features and targets towards the trainer.
    PublishTrainingFeatures { use_case: UseCase },

    /// Store training data in the trainer's repository.
    AddTrainingFeatures {
        use_case: UseCase,
        training_data: TrainingData,
    },
}

impl Command {
    /// Creates a [`Command::GetPrediction`].
    pub fn get_prediction(use_case: impl Into<UseCase>, user_id: impl Into<UserId>) -> Self {
        Command::GetPrediction {
            use_case: use_case.into(),
            user_id: user_id.into(),
        }
    }

    /// Creates a [`Command::TrainModel`].
    pub fn train_model(use_case: impl Into<UseCase>) -> Self {
        Command::TrainModel {
            use_case: use_case.into(),
        }
    }

    /// Returns the fieldless discriminant used to route the command.
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::GetPrediction { .. } => CommandKind::GetPrediction,
            Command::PublishModelForInference { .. } => CommandKind::PublishModelForInference,
            Command::AddModelForInference { .. } => CommandKind::AddModelForInference,
            Command::PublishInferenceFeatures { .. } => CommandKind::PublishInferenceFeatures,
            Command::AddFeaturesForInference { .. } => CommandKind::AddFeaturesForInference,
            Command::TrainModel { .. } => CommandKind::TrainModel,
            Command::AddModelToRegistry { .. } => CommandKind::AddModelToRegistry,
            Command::PublishTrainingFeatures { .. } => CommandKind::PublishTrainingFeatures,
            Command::AddTrainingFeatures { .. } => CommandKind::AddTrainingFeatures,
        }
    }

    /// Returns the command name.
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Returns the use-case the command is scoped to.
    pub fn use_case(&self) -> &UseCase {
        match self {
            Command::GetPrediction { use_case, .. }
            | Command::PublishModelForInference { use_case }
            | Command::AddModelForInference { use_case, .. }
            | Command::PublishInferenceFeatures { use_case }
            | Command::AddFeaturesForInference { use_case, .. }
            | Command::TrainModel { use_case }
            | Command::AddModelToRegistry { use_case, .. }
            | Command::PublishTrainingFeatures { use_case }
            | Command::AddTrainingFeatures { use_case, .. } => use_case,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::GetPrediction { use_case, user_id } => {
                write!(f, "GetPrediction(use_case={use_case}, user_id={user_id})")
            }
            other => write!(f, "{}(use_case={})", other.name(), other.use_case()),
        }
    }
}

/// Fieldless discriminant of [`Command`], used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    GetPrediction,
    PublishModelForInference,
    AddModelForInference,
    PublishInferenceFeatures,
    AddFeaturesForInference,
    TrainModel,
    AddModelToRegistry,
    PublishTrainingFeatures,
    AddTrainingFeatures,
}

impl CommandKind {
    /// Every command kind, in declaration order.
    pub const ALL: [CommandKind; 9] = [
        CommandKind::GetPrediction,
        CommandKind::PublishModelForInference,
        CommandKind::AddModelForInference,
        CommandKind::PublishInferenceFeatures,
        CommandKind::AddFeaturesForInference,
        CommandKind::TrainModel,
        CommandKind::AddModelToRegistry,
        CommandKind::PublishTrainingFeatures,
        CommandKind::AddTrainingFeatures,
    ];

    /// Returns the command name.
    pub fn name(self) -> &'static str {
        match self {
            CommandKind::GetPrediction => "GetPrediction",
            CommandKind::PublishModelForInference => "PublishModelForInference",
            CommandKind::AddModelForInference => "AddModelForInference",
            CommandKind::PublishInferenceFeatures => "PublishInferenceFeatures",
            CommandKind::AddFeaturesForInference => "AddFeaturesForInference",
            CommandKind::TrainModel => "TrainModel",
            CommandKind::AddModelToRegistry => "AddModelToRegistry",
            CommandKind::PublishTrainingFeatures => "PublishTrainingFeatures",
            CommandKind::AddTrainingFeatures => "AddTrainingFeatures",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fact about something that happened while handling a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    /// The final answer of a dispatch.
    NewPrediction { prediction: f64 },

    /// A registry model is ready to be stored for inference.
    NewModelForInference { use_case: UseCase, model: Model },

    /// Current features are ready to be stored for inference.
    NewFeaturesForInference {
        use_case: UseCase,
        feature_set: FeatureSet,
    },

    /// Training produced an updated model.
    NewTrainedModel { use_case: UseCase, model: Model },

    /// Historical features and targets are ready for the trainer.
    NewTrainingFeatures {
        use_case: UseCase,
        training_data: TrainingData,
    },
}

impl Event {
    /// Returns the event name.
    pub fn name(&self) -> &'static str {
        match self {
            Event::NewPrediction { .. } => "NewPrediction",
            Event::NewModelForInference { .. } => "NewModelForInference",
            Event::NewFeaturesForInference { .. } => "NewFeaturesForInference",
            Event::NewTrainedModel { .. } => "NewTrainedModel",
            Event::NewTrainingFeatures { .. } => "NewTrainingFeatures",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::NewPrediction { prediction } => write!(f, "NewPrediction({prediction})"),
            Event::NewModelForInference { use_case, .. }
            | Event::NewFeaturesForInference { use_case, .. }
            | Event::NewTrainedModel { use_case, .. }
            | Event::NewTrainingFeatures { use_case, .. } => {
                write!(f, "{}(use_case={use_case})", self.name())
            }
        }
    }
}

/// A recoverable failure with a known remediation command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Error {
    /// Inference has no model for the use-case.
    ModelNotFound { use_case: UseCase },

    /// Inference has no features for the use-case.
    InferenceMissingFeatures { use_case: UseCase },

    /// The trainer has no historical features for the use-case.
    ModelTrainingMissingFeatures { use_case: UseCase },
}

impl Error {
    /// Returns the error name.
    pub fn name(&self) -> &'static str {
        match self {
            Error::ModelNotFound { .. } => "ModelNotFound",
            Error::InferenceMissingFeatures { .. } => "InferenceMissingFeatures",
            Error::ModelTrainingMissingFeatures { .. } => "ModelTrainingMissingFeatures",
        }
    }

    /// Returns the use-case the error is scoped to.
    pub fn use_case(&self) -> &UseCase {
        match self {
            Error::ModelNotFound { use_case }
            | Error::InferenceMissingFeatures { use_case }
            | Error::ModelTrainingMissingFeatures { use_case } => use_case,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(use_case={})", self.name(), self.use_case())
    }
}

/// What a handler reports back: an event or an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Event(Event),
    Error(Error),
}

impl Response {
    /// Returns the name of the wrapped message.
    pub fn name(&self) -> &'static str {
        match self {
            Response::Event(event) => event.name(),
            Response::Error(error) => error.name(),
        }
    }
}

impl From<Event> for Response {
    fn from(event: Event) -> Self {
        Response::Event(event)
    }
}

impl From<Error> for Response {
    fn from(error: Error) -> Self {
        Response::Error(error)
    }
}

/// Any value that passed through the bus, as recorded in the dispatch log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    Command(Command),
    Event(Event),
    Error(Error),
}

impl Message {
    /// Returns the name of the wrapped message.
    pub fn name(&self) -> &'static str {
        match self {
            Message::Command(command) => command.name(),
            Message::Event(event) => event.name(),
            Message::Error(error) => error.name(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Command(command) => write!(f, "{command}"),
            Message::Event(event) => write!(f, "{event}"),
            Message::Error(error) => write!(f, "{error}"),
        }
    }
}

impl From<Command> for Message {
    fn from(command: Command) -> Self {
        Message::Command(command)
    }
}

impl From<Event> for Message {
    fn from(event: Event) -> Self {
        Message::Event(event)
    }
}

impl From<Error> for Message {
    fn from(error: Error) -> Self {
        Message::Error(error)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        match response {
            Response::Event(event) => Message::Event(event),
            Response::Error(error) => Message::Error(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_listed_once() {
        let mut names: Vec<&str> = CommandKind::ALL.iter().map(|kind| kind.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CommandKind::ALL.len());
    }

    #[test]
    fn test_command_kind_matches_variant() {
        let command = Command::get_prediction("u", "1");
        assert_eq!(command.kind(), CommandKind::GetPrediction);
        assert_eq!(command.use_case(), &UseCase::new("u"));

        let command = Command::train_model("u");
        assert_eq!(command.kind(), CommandKind::TrainModel);
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(
            Command::get_prediction("u", "1"),
            Command::get_prediction("u", "1")
        );
        assert_ne!(
            Command::get_prediction("u", "1"),
            Command::get_prediction("u", "2")
        );
        assert_eq!(
            Message::from(Error::ModelNotFound {
                use_case: UseCase::new("u")
            }),
            Message::Error(Error::ModelNotFound {
                use_case: UseCase::new("u")
            })
        );
    }


    #[test]
    fn test_display_includes_identifiers() {
        let command = Command::get_prediction("churn-risk", "42");
        assert_eq!(
            command.to_string(),
            "GetPrediction(use_case=churn-risk, user_id=42)"
        );

        let error = Error::InferenceMissingFeatures {
            use_case: UseCase::new("churn-risk"),
        };
        assert_eq!(
            error.to_string(),
            "InferenceMissingFeatures(use_case=churn-risk)"
        );
    }

    #[test]
    fn test_commands_serialize_with_type_tag() {
        let json = serde_json::to_value(Command::train_model("u")).unwrap();

        assert_eq!(json["type"], "TrainModel");
        assert_eq!(json["data"]["use_case"], "u");
    }
}
