//! Inference engine and its inference-side repositories.

mod engine;
mod repositories;

pub use engine::InferenceEngine;
pub use repositories::{InMemoryFeatureRepository, InMemoryModelRepository};
