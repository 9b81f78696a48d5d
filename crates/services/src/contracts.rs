//! Narrow capabilities the orchestration handlers depend on.
//!
//! Each handler is generic over exactly the capability it uses, so tests can
//! substitute any implementation without touching the bus.

use common::{FeatureSet, TrainingData, UseCase, UserId};
use domain::Model;

use crate::error::Result;

/// Produces a prediction for a user under a use-case.
pub trait Predictor {
    /// Fails with [`ServiceError::ModelNotFound`](crate::ServiceError::ModelNotFound)
    /// or [`ServiceError::FeatureSetNotFound`](crate::ServiceError::FeatureSetNotFound)
    /// when inference has not been provisioned yet.
    fn get_prediction(&self, user_id: &UserId, use_case: &UseCase) -> Result<f64>;
}

/// Looks up the model for a use-case.
pub trait ModelProvider {
    fn get_model(&self, use_case: &UseCase) -> Result<Model>;
}

/// Stores the model for a use-case, replacing any previous one.
pub trait ModelSink {
    fn add_model(&self, use_case: &UseCase, model: Model) -> Result<()>;
}

/// Looks up the current feature set for a use-case.
pub trait FeatureSetProvider {
    fn get_current_feature_set(&self, use_case: &UseCase) -> Result<FeatureSet>;
}

/// Stores the feature set for a use-case, replacing any previous one.
pub trait FeatureSetSink {
    fn add_feature_set(&self, use_case: &UseCase, feature_set: FeatureSet) -> Result<()>;
}

/// Looks up historical features and targets for a use-case.
pub trait TrainingDataProvider {
    fn get_training_data(&self, use_case: &UseCase) -> Result<TrainingData>;
}

/// Stores training data for a use-case, replacing any previous data.
pub trait TrainingDataSink {
    fn add_training_data(&self, use_case: &UseCase, training_data: TrainingData) -> Result<()>;
}

/// Trains the model of a use-case and returns the updated model.
pub trait ModelTrainer {
    fn train(&self, use_case: &UseCase) -> Result<Model>;
}
