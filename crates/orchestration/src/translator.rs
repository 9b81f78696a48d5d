//! Translation of events and errors into follow-up commands.

use crate::error::{BusError, Result};
use crate::messages::{Command, Error, Event, Response};

/// Decides which command follows an event or error.
pub trait Translate {
    /// Returns the next command, or fails for messages with no follow-up.
    fn next_command(&self, response: &Response) -> Result<Command>;
}

impl<F> Translate for F
where
    F: Fn(&Response) -> Result<Command>,
{
    fn next_command(&self, response: &Response) -> Result<Command> {
        self(response)
    }
}

/// The recovery and continuation policy of the pipeline.
///
/// | message                        | next command               |
/// |--------------------------------|----------------------------|
/// | `ModelNotFound`                | `PublishModelForInference` |
/// | `NewModelForInference`         | `AddModelForInference`     |
/// | `InferenceMissingFeatures`     | `PublishInferenceFeatures` |
/// | `NewFeaturesForInference`      | `AddFeaturesForInference`  |
/// | `ModelTrainingMissingFeatures` | `PublishTrainingFeatures`  |
/// | `NewTrainingFeatures`          | `AddTrainingFeatures`      |
/// | `NewTrainedModel`              | `AddModelToRegistry`       |
///
/// `NewPrediction` ends the dispatch and has no follow-up.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageTranslator;

impl MessageTranslator {
    /// Creates the translator.
    pub fn new() -> Self {
        Self
    }

    fn remediate(error: &Error) -> Command {
        match error {
            Error::ModelNotFound { use_case } => Command::PublishModelForInference {
                use_case: use_case.clone(),
            },
            Error::InferenceMissingFeatures { use_case } => Command::PublishInferenceFeatures {
                use_case: use_case.clone(),
            },
            Error::ModelTrainingMissingFeatures { use_case } => Command::PublishTrainingFeatures {
                use_case: use_case.clone(),
            },
        }
    }

    fn continue_from(event: &Event) -> Result<Command> {
        match event {
            Event::NewModelForInference { use_case, model } => Ok(Command::AddModelForInference {
                use_case: use_case.clone(),
                model: model.clone(),
            }),
            Event::NewFeaturesForInference {
                use_case,
                feature_set,
            } => Ok(Command::AddFeaturesForInference {
                use_case: use_case.clone(),
                feature_set: feature_set.clone(),
            }),
            Event::NewTrainedModel { use_case, model } => Ok(Command::AddModelToRegistry {
                use_case: use_case.clone(),
                model: model.clone(),
            }),
            Event::NewTrainingFeatures {
                use_case,
                training_data,
            } => Ok(Command::AddTrainingFeatures {
                use_case: use_case.clone(),
                training_data: training_data.clone(),
            }),
            Event::NewPrediction { .. } => Err(BusError::UntranslatableMessage {
                message: event.name(),
            }),
        }
    }
}

impl Translate for MessageTranslator {
    fn next_command(&self, response: &Response) -> Result<Command> {
        match response {
            Response::Error(error) => Ok(Self::remediate(error)),
            Response::Event(event) => Self::continue_from(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{FeatureSet, TrainingData, UseCase};
    use domain::{LinearModel, Model};

    fn use_case() -> UseCase {
        UseCase::new("churn-risk")
    }

    fn translate(response: impl Into<Response>) -> Result<Command> {
        MessageTranslator::new().next_command(&response.into())
    }

    #[test]
    fn test_model_not_found_publishes_model() {
        let command = translate(Error::ModelNotFound {
            use_case: use_case(),
        })
        .unwrap();

        assert_eq!(
            command,
            Command::PublishModelForInference {
                use_case: use_case()
            }
        );
    }

    #[test]
    fn test_new_model_is_added_for_inference() {
        let model: Model = LinearModel::default().with_weight("x", 1.0).into();

        let command = translate(Event::NewModelForInference {
            use_case: use_case(),
            model: model.clone(),
        })
        .unwrap();

        assert_eq!(
            command,
            Command::AddModelForInference {
                use_case: use_case(),
                model
            }
        );
    }

    #[test]
    fn test_missing_features_publishes_features() {
        let command = translate(Error::InferenceMissingFeatures {
            use_case: use_case(),
        })
        .unwrap();

        assert_eq!(
            command,
            Command::PublishInferenceFeatures {
                use_case: use_case()
            }
        );
    }

    #[test]
    fn test_new_features_are_added_for_inference() {
        let command = translate(Event::NewFeaturesForInference {
            use_case: use_case(),
            feature_set: FeatureSet::new(),
        })
        .unwrap();

        assert_eq!(
            command,
            Command::AddFeaturesForInference {
                use_case: use_case(),
                feature_set: FeatureSet::new()
            }
        );
    }

    #[test]
    fn test_training_rows() {
        let model: Model = LinearModel::default().into();

        assert_eq!(
            translate(Error::ModelTrainingMissingFeatures {
                use_case: use_case()
            })
            .unwrap(),
            Command::PublishTrainingFeatures {
                use_case: use_case()
            }
        );
        assert_eq!(
            translate(Event::NewTrainingFeatures {
                use_case: use_case(),
                training_data: TrainingData::default(),
            })
            .unwrap(),
            Command::AddTrainingFeatures {
                use_case: use_case(),
                training_data: TrainingData::default(),
            }
        );
        assert_eq!(
            translate(Event::NewTrainedModel {
                use_case: use_case(),
                model: model.clone(),
            })
            .unwrap(),
            Command::AddModelToRegistry {
                use_case: use_case(),
                model
            }
        );
    }

    #[test]
    fn test_new_prediction_is_untranslatable() {
        let err = translate(Event::NewPrediction { prediction: 1.0 }).unwrap_err();

        assert!(matches!(
            err,
            BusError::UntranslatableMessage {
                message: "NewPrediction"
            }
        ));
    }

    #[test]
    fn test_closures_can_translate() {
        let stub = |_: &Response| -> Result<Command> { Ok(Command::train_model("stub")) };

        let command = stub
            .next_command(&Event::NewPrediction { prediction: 0.0 }.into())
            .unwrap();

        assert_eq!(command, Command::train_model("stub"));
    }
}
