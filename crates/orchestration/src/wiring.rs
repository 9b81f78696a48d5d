//! Binding handler functions to the collaborators they act on.

use services::{
    FeatureSetProvider, FeatureSetSink, ModelProvider, ModelSink, ModelTrainer, Predictor,
    TrainingDataProvider, TrainingDataSink,
};

use crate::handler::CommandHandler;
use crate::handlers;
use crate::messages::CommandKind;

/// The collaborators a complete registry needs.
///
/// Each handler closure captures its own clone of exactly the collaborator it
/// calls, so collaborators must be cheap shared handles.
#[derive(Debug, Clone)]
pub struct Collaborators<I, R, F, T> {
    /// Serves predictions and receives provisioned models and features.
    pub inference: I,

    /// Source of published models; receives trained models.
    pub model_registry: R,

    /// Source of current features and of training data.
    pub feature_store: F,

    /// Trains models and receives training data.
    pub trainer: T,
}

impl<I, R, F, T> Collaborators<I, R, F, T>
where
    I: Predictor + ModelSink + FeatureSetSink + Clone + 'static,
    R: ModelProvider + ModelSink + Clone + 'static,
    F: FeatureSetProvider + TrainingDataProvider + Clone + 'static,
    T: ModelTrainer + TrainingDataSink + Clone + 'static,
{
    /// Builds a registry with a handler for every command kind.
    pub fn into_command_handler(self) -> CommandHandler {
        let Self {
            inference,
            model_registry,
            feature_store,
            trainer,
        } = self;
        let mut handler = CommandHandler::new();

        let predictor = inference.clone();
        handler.register(CommandKind::GetPrediction, move |command| {
            handlers::get_prediction(command, &predictor)
        });

        let registry = model_registry.clone();
        handler.register(CommandKind::PublishModelForInference, move |command| {
            handlers::publish_model_for_inference(command, &registry)
        });

        let models = inference.clone();
        handler.register(CommandKind::AddModelForInference, move |command| {
            handlers::add_model_for_inference(command, &models)
        });

        let store = feature_store.clone();
        handler.register(CommandKind::PublishInferenceFeatures, move |command| {
            handlers::publish_inference_features(command, &store)
        });

        handler.register(CommandKind::AddFeaturesForInference, move |command| {
            handlers::add_features_for_inference(command, &inference)
        });

        let fitter = trainer.clone();
        handler.register(CommandKind::TrainModel, move |command| {
            handlers::train_model(command, &fitter)
        });

        handler.register(CommandKind::AddModelToRegistry, move |command| {
            handlers::add_model_to_registry(command, &model_registry)
        });

        handler.register(CommandKind::PublishTrainingFeatures, move |command| {
            handlers::publish_training_features(command, &feature_store)
        });

        handler.register(CommandKind::AddTrainingFeatures, move |command| {
            handlers::add_training_features(command, &trainer)
        });

        handler
    }
}
