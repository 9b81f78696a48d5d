//! Initial collaborator state loaded from JSON.

use std::collections::BTreeMap;
use std::path::Path;

use common::{FeatureSet, Targets, UseCase};
use domain::Model;
use orchestration::Collaborators;
use serde::{Deserialize, Serialize};
use services::{
    FeatureStore, InMemoryTrainingDataRepository, InMemoryTrainingModelRepository,
    InferenceEngine, ModelRegistry, Trainer,
};

use crate::error::{AppError, Result};

const DEMO_SEED: &str = include_str!("../fixtures/demo_seed.json");

/// The collaborators wired by the runner.
pub type AppCollaborators = Collaborators<InferenceEngine, ModelRegistry, FeatureStore, Trainer>;

/// Everything the collaborators start with, keyed by use-case.
///
/// Inference always starts empty; it is provisioned through the bus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Seed {
    /// Models published to the registry.
    pub registry_models: BTreeMap<UseCase, Model>,

    /// Models the trainer fits.
    pub training_models: BTreeMap<UseCase, Model>,

    /// Features served to inference.
    pub current_features: BTreeMap<UseCase, FeatureSet>,

    /// Features served to training.
    pub historical_features: BTreeMap<UseCase, FeatureSet>,

    /// Training targets.
    pub targets: BTreeMap<UseCase, Targets>,
}

impl Seed {
    /// Returns the built-in demo seed.
    pub fn demo() -> Result<Self> {
        Self::from_json(DEMO_SEED)
    }

    /// Parses a seed from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a seed file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::SeedRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Builds fresh collaborators holding this seed's state.
    pub fn into_collaborators(self) -> AppCollaborators {
        let mut feature_store = FeatureStore::new();
        for (use_case, set) in self.current_features {
            feature_store = feature_store.with_current_features(use_case, set);
        }
        for (use_case, set) in self.historical_features {
            feature_store = feature_store.with_historical_features(use_case, set);
        }
        for (use_case, targets) in self.targets {
            feature_store = feature_store.with_targets(use_case, targets);
        }

        let trainer = Trainer::with_repositories(
            InMemoryTrainingModelRepository::from_models(self.training_models),
            InMemoryTrainingDataRepository::new(),
        );

        Collaborators {
            inference: InferenceEngine::new(),
            model_registry: ModelRegistry::from_models(self.registry_models),
            feature_store,
            trainer,
        }
    }
}

#[cfg(test)]
mod tests {
    use services::{FeatureSetProvider, ModelProvider};

    use super::*;

    #[test]
    fn test_demo_seed_parses() {
        let seed = Seed::demo().unwrap();

        assert!(seed.registry_models.contains_key(&UseCase::new("churn-risk")));
        assert!(seed.training_models.contains_key(&UseCase::new("churn-risk")));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let seed = Seed::from_json("{}").unwrap();
        assert_eq!(seed, Seed::default());
    }

    #[test]
    fn test_collaborators_hold_seeded_state() {
        let collaborators = Seed::demo().unwrap().into_collaborators();
        let use_case = UseCase::new("churn-risk");

        assert!(collaborators.model_registry.get_model(&use_case).is_ok());
        assert!(
            collaborators
                .feature_store
                .get_current_feature_set(&use_case)
                .is_ok()
        );
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Seed::from_path(Path::new("/nonexistent/seed.json")).unwrap_err();
        assert!(matches!(err, AppError::SeedRead { .. }));
        assert!(err.to_string().contains("/nonexistent/seed.json"));
    }
}
