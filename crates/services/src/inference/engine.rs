use common::{FeatureSet, FeatureVector, UseCase, UserId};
use domain::Model;

use crate::contracts::{FeatureSetSink, ModelSink, Predictor};
use crate::error::Result;
use crate::inference::repositories::{InMemoryFeatureRepository, InMemoryModelRepository};

/// Serves predictions from models and features provisioned for inference.
///
/// The engine never reaches into the registry or the feature store itself;
/// the orchestration layer copies models and features in when a prediction
/// reports them missing.
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    models: InMemoryModelRepository,
    features: InMemoryFeatureRepository,
}

impl InferenceEngine {
    /// Creates an engine with empty repositories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine over existing repositories.
    pub fn with_repositories(
        models: InMemoryModelRepository,
        features: InMemoryFeatureRepository,
    ) -> Self {
        Self { models, features }
    }

    /// Returns the inference-side model repository.
    pub fn models(&self) -> &InMemoryModelRepository {
        &self.models
    }

    /// Returns the inference-side feature repository.
    pub fn features(&self) -> &InMemoryFeatureRepository {
        &self.features
    }
}

impl Predictor for InferenceEngine {
    #[tracing::instrument(skip(self))]
    fn get_prediction(&self, user_id: &UserId, use_case: &UseCase) -> Result<f64> {
        let model = self.models.get_model(use_case)?;

        let features = if model.requires_features() {
            self.features.get_features(user_id, use_case)?
        } else {
            FeatureVector::new()
        };

        let prediction = model.predict(&features)?;
        metrics::counter!("inference_predictions_total", "model" => model.kind()).increment(1);
        Ok(prediction)
    }
}

impl ModelSink for InferenceEngine {
    fn add_model(&self, use_case: &UseCase, model: Model) -> Result<()> {
        tracing::debug!(%use_case, kind = model.kind(), "model provisioned for inference");
        self.models.add_model(use_case, model)
    }
}

impl FeatureSetSink for InferenceEngine {
    fn add_feature_set(&self, use_case: &UseCase, feature_set: FeatureSet) -> Result<()> {
        tracing::debug!(%use_case, users = feature_set.len(), "features provisioned for inference");
        self.features.add_features(use_case, feature_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use domain::{ConstantModel, Rule, RulesModel};

    #[test]
    fn test_returns_expected_constant_value() {
        let use_case = UseCase::new("unused");
        let models = InMemoryModelRepository::from_models([(
            use_case.clone(),
            ConstantModel::new(0.85).into(),
        )]);
        let engine = InferenceEngine::with_repositories(models, InMemoryFeatureRepository::new());

        let prediction = engine
            .get_prediction(&UserId::new("unused"), &use_case)
            .unwrap();

        assert_eq!(prediction, 0.85);
    }

    #[test]
    fn test_produces_different_predictions_for_different_use_cases() {
        let first = UseCase::new("stub_use_case_1");
        let second = UseCase::new("stub_use_case_2");
        let models = InMemoryModelRepository::from_models([
            (first.clone(), ConstantModel::new(0.111).into()),
            (second.clone(), ConstantModel::new(0.9).into()),
        ]);
        let engine = InferenceEngine::with_repositories(models, InMemoryFeatureRepository::new());
        let user = UserId::new("stub_user_id");

        assert_eq!(engine.get_prediction(&user, &first).unwrap(), 0.111);
        assert_eq!(engine.get_prediction(&user, &second).unwrap(), 0.9);
    }

    #[test]
    fn test_returns_expected_predictions_for_different_users() {
        let use_case = UseCase::new("unused");
        let model = RulesModel::new(0.0)
            .with_rule(Rule::new("stub_feature", 1234.0, 0.75))
            .with_rule(Rule::new("stub_feature", 123.0, 0.5));
        let set = FeatureSet::from([
            (
                UserId::new("stub_user_1"),
                FeatureVector::from([("stub_feature".to_string(), 123.0)]),
            ),
            (
                UserId::new("stub_user_2"),
                FeatureVector::from([("stub_feature".to_string(), 1234.0)]),
            ),
        ]);
        let engine = InferenceEngine::new();
        engine.add_model(&use_case, model.into()).unwrap();
        engine.add_feature_set(&use_case, set).unwrap();

        let first = engine
            .get_prediction(&UserId::new("stub_user_1"), &use_case)
            .unwrap();
        let second = engine
            .get_prediction(&UserId::new("stub_user_2"), &use_case)
            .unwrap();

        assert_eq!(first, 0.5);
        assert_eq!(second, 0.75);
    }

    #[test]
    fn test_model_is_looked_up_before_features() {
        let engine = InferenceEngine::new();

        let err = engine
            .get_prediction(&UserId::new("u"), &UseCase::new("empty"))
            .unwrap_err();

        assert!(matches!(err, ServiceError::ModelNotFound { .. }));
    }

    #[test]
    fn test_feature_model_without_features_reports_missing_set() {
        let use_case = UseCase::new("rules");
        let engine = InferenceEngine::new();
        engine
            .add_model(&use_case, RulesModel::new(0.3).into())
            .unwrap();

        let err = engine
            .get_prediction(&UserId::new("u"), &use_case)
            .unwrap_err();

        assert!(matches!(err, ServiceError::FeatureSetNotFound { .. }));
    }

    #[test]
    fn test_clones_share_repositories() {
        let use_case = UseCase::new("shared");
        let engine = InferenceEngine::new();
        let writer = engine.clone();

        writer
            .add_model(&use_case, ConstantModel::new(0.2).into())
            .unwrap();

        assert!(engine.models().contains(&use_case).unwrap());
        assert!(!engine.features().contains(&use_case).unwrap());
    }
}
