//! Trainer and its training-side repositories.

mod repositories;
mod trainer;

pub use repositories::{InMemoryTrainingDataRepository, InMemoryTrainingModelRepository};
pub use trainer::Trainer;
