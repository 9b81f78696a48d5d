use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::{TrainingData, UseCase};
use domain::Model;

use crate::error::{Result, ServiceError};
use crate::lock;

/// Models the trainer fits, keyed by use-case.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrainingModelRepository {
    models: Arc<RwLock<HashMap<UseCase, Model>>>,
}

impl InMemoryTrainingModelRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with models.
    pub fn from_models(models: impl IntoIterator<Item = (UseCase, Model)>) -> Self {
        Self {
            models: Arc::new(RwLock::new(models.into_iter().collect())),
        }
    }

    /// Returns the model for a use-case.
    pub fn get_model(&self, use_case: &UseCase) -> Result<Model> {
        lock::read(&self.models, "training_models")?
            .get(use_case)
            .cloned()
            .ok_or_else(|| ServiceError::ModelNotFound {
                use_case: use_case.clone(),
            })
    }

    /// Stores the model for a use-case, replacing any previous one.
    pub fn save_model(&self, use_case: &UseCase, model: Model) -> Result<()> {
        lock::write(&self.models, "training_models")?.insert(use_case.clone(), model);
        Ok(())
    }
}

/// Historical features and targets the trainer fits against.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrainingDataRepository {
    data: Arc<RwLock<HashMap<UseCase, TrainingData>>>,
}

impl InMemoryTrainingDataRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with training data.
    pub fn from_training_data(data: impl IntoIterator<Item = (UseCase, TrainingData)>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data.into_iter().collect())),
        }
    }

    /// Returns the training data of a use-case.
    pub fn get_training_data(&self, use_case: &UseCase) -> Result<TrainingData> {
        lock::read(&self.data, "training_data")?
            .get(use_case)
            .cloned()
            .ok_or_else(|| ServiceError::TrainingDataNotFound {
                use_case: use_case.clone(),
            })
    }

    /// Stores the training data of a use-case, replacing any previous data.
    pub fn add_training_data(&self, use_case: &UseCase, data: TrainingData) -> Result<()> {
        lock::write(&self.data, "training_data")?.insert(use_case.clone(), data);
        Ok(())
    }
}
