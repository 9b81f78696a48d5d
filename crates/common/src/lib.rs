//! Shared identifiers and data shapes used across the workspace.

mod types;

pub use types::{
    DispatchId, FeatureName, FeatureSet, FeatureVector, Target, Targets, TrainingData, UseCase,
    UserId,
};
