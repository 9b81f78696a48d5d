use common::{TrainingData, UseCase};
use domain::Model;

use crate::contracts::{ModelTrainer, TrainingDataSink};
use crate::error::{Result, ServiceError};
use crate::training::repositories::{
    InMemoryTrainingDataRepository, InMemoryTrainingModelRepository,
};

/// Fits trainable models against historical features and targets.
#[derive(Debug, Clone, Default)]
pub struct Trainer {
    models: InMemoryTrainingModelRepository,
    data: InMemoryTrainingDataRepository,
}

impl Trainer {
    /// Creates a trainer with empty repositories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a trainer over existing repositories.
    pub fn with_repositories(
        models: InMemoryTrainingModelRepository,
        data: InMemoryTrainingDataRepository,
    ) -> Self {
        Self { models, data }
    }

    /// Returns the training-side model repository.
    pub fn models(&self) -> &InMemoryTrainingModelRepository {
        &self.models
    }

    fn fit(use_case: &UseCase, model: &mut Model, data: &TrainingData) -> Result<()> {
        let kind = model.kind();
        let trainable = model
            .as_trainable_mut()
            .ok_or_else(|| ServiceError::NotTrainable {
                use_case: use_case.clone(),
                kind,
            })?;

        for (user_id, features) in &data.features {
            let target = data
                .targets
                .get(user_id)
                .copied()
                .ok_or_else(|| ServiceError::TargetNotFound {
                    use_case: use_case.clone(),
                    user_id: user_id.clone(),
                })?;
            trainable.update_weights(features, target)?;
        }

        Ok(())
    }
}

impl ModelTrainer for Trainer {
    /// Trains the use-case model with one update per user, in user-id order.
    ///
    /// A missing model is a fault; missing training data is reported as
    /// [`ServiceError::TrainingDataNotFound`] so it can be provisioned.
    #[tracing::instrument(skip(self))]
    fn train(&self, use_case: &UseCase) -> Result<Model> {
        let mut model = self.models.get_model(use_case)?;
        let data = self.data.get_training_data(use_case)?;

        Self::fit(use_case, &mut model, &data)?;
        self.models.save_model(use_case, model.clone())?;

        metrics::counter!("trainer_runs_total").increment(1);
        tracing::info!(users = data.features.len(), "model trained");
        Ok(model)
    }
}

impl TrainingDataSink for Trainer {
    fn add_training_data(&self, use_case: &UseCase, training_data: TrainingData) -> Result<()> {
        self.data.add_training_data(use_case, training_data)
    }
}
