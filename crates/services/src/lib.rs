//! Collaborators of the orchestration layer.
//!
//! Each service is an in-memory store behind a narrow contract trait:
//! - [`FeatureStore`] holds current and historical features plus targets
//! - [`ModelRegistry`] holds the published model per use-case
//! - [`InferenceEngine`] serves predictions from its own model and feature copies
//! - [`Trainer`] fits trainable models against historical data
//!
//! The orchestration handlers only see the traits in [`contracts`].

pub mod contracts;
pub mod error;
pub mod feature_store;
pub mod inference;
pub mod model_registry;
pub mod training;

mod lock;

pub use contracts::{
    FeatureSetProvider, FeatureSetSink, ModelProvider, ModelSink, ModelTrainer, Predictor,
    TrainingDataProvider, TrainingDataSink,
};
pub use error::{Result, ServiceError};
pub use feature_store::FeatureStore;
pub use inference::{InMemoryFeatureRepository, InMemoryModelRepository, InferenceEngine};
pub use model_registry::ModelRegistry;
pub use training::{InMemoryTrainingDataRepository, InMemoryTrainingModelRepository, Trainer};
