//! Service error types.

use common::{UseCase, UserId};
use domain::ModelError;
use thiserror::Error;

/// Errors that can occur inside a collaborator.
///
/// Only some of these are expected domain failures; the orchestration
/// handlers decide which ones become recoverable messages.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No model is stored for the use-case.
    #[error("Model not found for use case: {use_case}")]
    ModelNotFound { use_case: UseCase },

    /// No feature set is stored for the use-case.
    #[error("Feature set not found for use case: {use_case}")]
    FeatureSetNotFound { use_case: UseCase },

    /// The use-case has features, but none for this user.
    #[error("User {user_id} not found in features for use case: {use_case}")]
    UserNotFound { use_case: UseCase, user_id: UserId },

    /// No training target is stored for this user.
    #[error("Target not found for user {user_id} in use case: {use_case}")]
    TargetNotFound { use_case: UseCase, user_id: UserId },

    /// The trainer has no historical features for the use-case.
    #[error("Training data not found for use case: {use_case}")]
    TrainingDataNotFound { use_case: UseCase },

    /// The stored model kind cannot be trained.
    #[error("Model of kind '{kind}' for use case {use_case} cannot be trained")]
    NotTrainable {
        use_case: UseCase,
        kind: &'static str,
    },

    /// The model rejected its input.
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    /// A writer panicked while holding the store lock.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;
