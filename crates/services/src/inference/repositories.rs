use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::{FeatureSet, FeatureVector, UseCase, UserId};
use domain::Model;

use crate::error::{Result, ServiceError};
use crate::lock;

/// Models provisioned for inference, keyed by use-case.
#[derive(Debug, Clone, Default)]
pub struct InMemoryModelRepository {
    models: Arc<RwLock<HashMap<UseCase, Model>>>,
}

impl InMemoryModelRepository {
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
        lock::read(&self.models, "inference_models")?
            .get(use_case)
            .cloned()
            .ok_or_else(|| ServiceError::ModelNotFound {
                use_case: use_case.clone(),
            })
    }

    /// Stores the model for a use-case, replacing any previous one.
    pub fn add_model(&self, use_case: &UseCase, model: Model) -> Result<()> {
        lock::write(&self.models, "inference_models")?.insert(use_case.clone(), model);
        Ok(())
    }

    /// Returns true if a model is provisioned for the use-case.
    pub fn contains(&self, use_case: &UseCase) -> Result<bool> {
        Ok(lock::read(&self.models, "inference_models")?.contains_key(use_case))
    }
}

/// Feature sets provisioned for inference, keyed by use-case.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFeatureRepository {
    features: Arc<RwLock<HashMap<UseCase, FeatureSet>>>,
}

impl InMemoryFeatureRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with feature sets.
    pub fn from_feature_sets(sets: impl IntoIterator<Item = (UseCase, FeatureSet)>) -> Self {
        Self {
            features: Arc::new(RwLock::new(sets.into_iter().collect())),
        }
    }

    /// Returns the feature vector of one user.
    ///
    /// A missing use-case is [`ServiceError::FeatureSetNotFound`]; a missing
    /// user inside a known use-case is [`ServiceError::UserNotFound`].
    pub fn get_features(&self, user_id: &UserId, use_case: &UseCase) -> Result<FeatureVector> {
        let features = lock::read(&self.features, "inference_features")?;
        let set = features
            .get(use_case)
            .ok_or_else(|| ServiceError::FeatureSetNotFound {
                use_case: use_case.clone(),
            })?;

        set.get(user_id)
            .cloned()
            .ok_or_else(|| ServiceError::UserNotFound {
                use_case: use_case.clone(),
                user_id: user_id.clone(),
            })
    }

    /// Stores the feature set for a use-case, replacing any previous one.
    pub fn add_features(&self, use_case: &UseCase, set: FeatureSet) -> Result<()> {
        lock::write(&self.features, "inference_features")?.insert(use_case.clone(), set);
        Ok(())
    }

    /// Returns true if a feature set is provisioned for the use-case.
    pub fn contains(&self, use_case: &UseCase) -> Result<bool> {
        Ok(lock::read(&self.features, "inference_features")?.contains_key(use_case))
    }
}
