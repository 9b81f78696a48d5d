//! Domain layer for the prediction pipeline.
//!
//! This crate provides the model value objects that flow through the
//! orchestration layer:
//! - [`Model`], a closed set of predictor kinds
//! - [`LinearModel`], the only kind that can be trained
//! - [`ModelError`] for predictions that cannot be computed

pub mod error;
pub mod model;

pub use error::ModelError;
pub use model::{ConstantModel, LinearModel, Model, Rule, RulesModel};
