//! Model registry: the source of truth for published models.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::UseCase;
use domain::Model;

use crate::contracts::{ModelProvider, ModelSink};
use crate::error::{Result, ServiceError};
use crate::lock;

/// In-memory model registry keyed by use-case.
///
/// Cloning is cheap; every clone reads and writes the same registry.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Arc<RwLock<HashMap<UseCase, Model>>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with models.
    pub fn from_models(models: impl IntoIterator<Item = (UseCase, Model)>) -> Self {
        Self {
            models: Arc::new(RwLock::new(models.into_iter().collect())),
        }
    }

    /// Returns the number of registered use-cases.
    pub fn len(&self) -> Result<usize> {
        Ok(lock::read(&self.models, "model_registry")?.len())
    }

    /// Returns true if no model is registered.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl ModelProvider for ModelRegistry {
    fn get_model(&self, use_case: &UseCase) -> Result<Model> {
        lock::read(&self.models, "model_registry")?
            .get(use_case)
            .cloned()
            .ok_or_else(|| ServiceError::ModelNotFound {
                use_case: use_case.clone(),
            })
    }
}

impl ModelSink for ModelRegistry {
    #[tracing::instrument(skip(self, model), fields(kind = model.kind()))]
    fn add_model(&self, use_case: &UseCase, model: Model) -> Result<()> {
        lock::write(&self.models, "model_registry")?.insert(use_case.clone(), model);
        metrics::counter!("model_registry_writes_total").increment(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ConstantModel;

    fn stub_model() -> Model {
        ConstantModel::new(0.5).into()
    }

    #[test]
    fn test_returns_model_for_existing_use_case() {
        let use_case = UseCase::new("stub_use_case");
        let registry = ModelRegistry::from_models([(use_case.clone(), stub_model())]);

        assert_eq!(registry.get_model(&use_case).unwrap(), stub_model());
    }

    #[test]
    fn test_errors_for_unknown_use_case() {
        let registry = ModelRegistry::new();

        let err = registry.get_model(&UseCase::new("unknown")).unwrap_err();
        assert!(err.to_string().starts_with("Model not found"));
    }

    #[test]
    fn test_handles_multiple_use_cases() {
        let first = UseCase::new("stub_use_case_1");
        let second = UseCase::new("stub_use_case_2");
        let other_model: Model = ConstantModel::new(0.9).into();
        let registry = ModelRegistry::from_models([
            (first.clone(), stub_model()),
            (second.clone(), other_model.clone()),
        ]);

        assert_eq!(registry.get_model(&first).unwrap(), stub_model());
        assert_eq!(registry.get_model(&second).unwrap(), other_model);
        assert_eq!(registry.len().unwrap(), 2);
    }

    #[test]
    fn test_add_model_replaces_and_is_shared_between_clones() {
        let use_case = UseCase::new("stub_use_case");
        let registry = ModelRegistry::new();
        let writer = registry.clone();
        assert!(registry.is_empty().unwrap());

        writer.add_model(&use_case, stub_model()).unwrap();
        let replacement: Model = ConstantModel::new(0.1).into();
        writer.add_model(&use_case, replacement.clone()).unwrap();

        assert_eq!(registry.get_model(&use_case).unwrap(), replacement);
        assert_eq!(registry.len().unwrap(), 1);
    }
}
