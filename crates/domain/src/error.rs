//! Model error types.

use common::FeatureName;
use thiserror::Error;

/// Errors that can occur while predicting or updating weights.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A feature the model depends on is absent from the feature vector.
    #[error("Missing feature: {feature}")]
    MissingFeature { feature: FeatureName },

    /// The learning rate must be a positive, finite number.
    #[error("Invalid learning rate: {0}")]
    InvalidLearningRate(f64),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
