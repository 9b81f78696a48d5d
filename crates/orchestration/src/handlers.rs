//! Handler functions, one per command kind.
//!
//! Each handler performs exactly one collaborator call. Expected domain
//! failures come back as [`Error`] messages; any other collaborator failure is
//! propagated as [`BusError::Collaborator`].

use services::{
    FeatureSetProvider, FeatureSetSink, ModelProvider, ModelSink, ModelTrainer, Predictor,
    ServiceError, TrainingDataProvider, TrainingDataSink,
};

use crate::error::{BusError, Result};
use crate::messages::{Command, CommandKind, Error, Event, Response};

fn mismatch(expected: CommandKind, command: &Command) -> BusError {
    BusError::HandlerMismatch {
        expected,
        actual: command.kind(),
    }
}

/// Handles [`Command::GetPrediction`].
///
/// A missing inference model becomes [`Error::ModelNotFound`] and a missing
/// inference feature set becomes [`Error::InferenceMissingFeatures`].
pub fn get_prediction<P>(command: &Command, predictor: &P) -> Result<Option<Response>>
where
    P: Predictor + ?Sized,
{
    let Command::GetPrediction { use_case, user_id } = command else {
        return Err(mismatch(CommandKind::GetPrediction, command));
    };

    let response = match predictor.get_prediction(user_id, use_case) {
        Ok(prediction) => Event::NewPrediction { prediction }.into(),
        Err(ServiceError::ModelNotFound { .. }) => Error::ModelNotFound {
            use_case: use_case.clone(),
        }
        .into(),
        Err(ServiceError::FeatureSetNotFound { .. }) => Error::InferenceMissingFeatures {
            use_case: use_case.clone(),
        }
        .into(),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(response))
}

/// Handles [`Command::PublishModelForInference`].
pub fn publish_model_for_inference<R>(command: &Command, registry: &R) -> Result<Option<Response>>
where
    R: ModelProvider + ?Sized,
{
    let Command::PublishModelForInference { use_case } = command else {
        return Err(mismatch(CommandKind::PublishModelForInference, command));
    };

    let model = registry.get_model(use_case)?;
    Ok(Some(
        Event::NewModelForInference {
            use_case: use_case.clone(),
            model,
        }
        .into(),
    ))
}

/// Handles [`Command::AddModelForInference`].
pub fn add_model_for_inference<S>(command: &Command, inference: &S) -> Result<Option<Response>>
where
    S: ModelSink + ?Sized,
{
    let Command::AddModelForInference { use_case, model } = command else {
        return Err(mismatch(CommandKind::AddModelForInference, command));
    };

    inference.add_model(use_case, model.clone())?;
    Ok(None)
}

/// Handles [`Command::PublishInferenceFeatures`].
pub fn publish_inference_features<F>(command: &Command, feature_store: &F) -> Result<Option<Response>>
where
    F: FeatureSetProvider + ?Sized,
{
    let Command::PublishInferenceFeatures { use_case } = command else {
        return Err(mismatch(CommandKind::PublishInferenceFeatures, command));
    };

    let feature_set = feature_store.get_current_feature_set(use_case)?;
    Ok(Some(
        Event::NewFeaturesForInference {
            use_case: use_case.clone(),
            feature_set,
        }
        .into(),
    ))
}

/// Handles [`Command::AddFeaturesForInference`].
pub fn add_features_for_inference<S>(command: &Command, inference: &S) -> Result<Option<Response>>
where
    S: FeatureSetSink + ?Sized,
{
    let Command::AddFeaturesForInference {
        use_case,
        feature_set,
    } = command
    else {
        return Err(mismatch(CommandKind::AddFeaturesForInference, command));
    };

    inference.add_feature_set(use_case, feature_set.clone())?;
    Ok(None)
}

/// Handles [`Command::TrainModel`].
///
/// Missing training data becomes [`Error::ModelTrainingMissingFeatures`].
pub fn train_model<T>(command: &Command, trainer: &T) -> Result<Option<Response>>
where
    T: ModelTrainer + ?Sized,
{
    let Command::TrainModel { use_case } = command else {
        return Err(mismatch(CommandKind::TrainModel, command));
    };

    let response = match trainer.train(use_case) {
        Ok(model) => Event::NewTrainedModel {
            use_case: use_case.clone(),
            model,
        }
        .into(),
        Err(ServiceError::TrainingDataNotFound { .. }) => Error::ModelTrainingMissingFeatures {
            use_case: use_case.clone(),
        }
        .into(),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(response))
}

/// Handles [`Command::AddModelToRegistry`].
pub fn add_model_to_registry<S>(command: &Command, registry: &S) -> Result<Option<Response>>
where
    S: ModelSink + ?Sized,
{
    let Command::AddModelToRegistry { use_case, model } = command else {
        return Err(mismatch(CommandKind::AddModelToRegistry, command));
    };

    registry.add_model(use_case, model.clone())?;
    Ok(None)
}

/// Handles [`Command::PublishTrainingFeatures`].
pub fn publish_training_features<F>(command: &Command, feature_store: &F) -> Result<Option<Response>>
where
    F: TrainingDataProvider + ?Sized,
{
    let Command::PublishTrainingFeatures { use_case } = command else {
        return Err(mismatch(CommandKind::PublishTrainingFeatures, command));
    };

    let training_data = feature_store.get_training_data(use_case)?;
    Ok(Some(
        Event::NewTrainingFeatures {
            use_case: use_case.clone(),
            training_data,
        }
        .into(),
    ))
}

/// Handles [`Command::AddTrainingFeatures`].
pub fn add_training_features<S>(command: &Command, trainer: &S) -> Result<Option<Response>>
where
    S: TrainingDataSink + ?Sized,
{
    let Command::AddTrainingFeatures {
        use_case,
        training_data,
    } = command
    else {
        return Err(mismatch(CommandKind::AddTrainingFeatures, command));
    };

    trainer.add_training_data(use_case, training_data.clone())?;
    Ok(None)
}
