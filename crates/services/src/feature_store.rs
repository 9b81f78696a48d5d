//! Feature store holding current features, historical features and targets.

use std::collections::HashMap;
use std::sync::Arc;

use common::{FeatureSet, FeatureVector, Target, Targets, TrainingData, UseCase, UserId};

use crate::contracts::{FeatureSetProvider, TrainingDataProvider};
use crate::error::{Result, ServiceError};

#[derive(Debug, Clone, Default)]
struct FeatureStoreState {
    current: HashMap<UseCase, FeatureSet>,
    historical: HashMap<UseCase, FeatureSet>,
    targets: HashMap<UseCase, Targets>,
}

/// Read-only feature store, scoped by use-case.
///
/// Current features feed inference; historical features and targets feed
/// training. Cloning is cheap and every clone sees the same data.
#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    state: Arc<FeatureStoreState>,
}

impl FeatureStore {
    /// Creates an empty feature store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the current feature set of a use-case.
    pub fn with_current_features(mut self, use_case: impl Into<UseCase>, set: FeatureSet) -> Self {
        Arc::make_mut(&mut self.state)
            .current
            .insert(use_case.into(), set);
        self
    }

    /// Sets the historical feature set of a use-case.
    pub fn with_historical_features(
        mut self,
        use_case: impl Into<UseCase>,
        set: FeatureSet,
    ) -> Self {
        Arc::make_mut(&mut self.state)
            .historical
            .insert(use_case.into(), set);
        self
    }

    /// Sets the training targets of a use-case.
    pub fn with_targets(mut self, use_case: impl Into<UseCase>, targets: Targets) -> Self {
        Arc::make_mut(&mut self.state)
            .targets
            .insert(use_case.into(), targets);
        self
    }

    /// Returns the current feature vector of one user.
    pub fn get_current_features(&self, user_id: &UserId, use_case: &UseCase) -> Result<FeatureVector> {
        user_features(&self.state.current, user_id, use_case)
    }

    /// Returns the historical feature vector of one user.
    pub fn get_historical_features(
        &self,
        user_id: &UserId,
        use_case: &UseCase,
    ) -> Result<FeatureVector> {
        user_features(&self.state.historical, user_id, use_case)
    }

    /// Returns the users that have historical features, in ascending order.
    pub fn get_user_ids(&self, use_case: &UseCase) -> Result<Vec<UserId>> {
        let set = feature_set(&self.state.historical, use_case)?;
        Ok(set.keys().cloned().collect())
    }

    /// Returns the training target of one user.
    pub fn get_target(&self, user_id: &UserId, use_case: &UseCase) -> Result<Target> {
        self.state
            .targets
            .get(use_case)
            .and_then(|targets| targets.get(user_id))
            .copied()
            .ok_or_else(|| ServiceError::TargetNotFound {
                use_case: use_case.clone(),
                user_id: user_id.clone(),
            })
    }
}

impl FeatureSetProvider for FeatureStore {
    fn get_current_feature_set(&self, use_case: &UseCase) -> Result<FeatureSet> {
        feature_set(&self.state.current, use_case).cloned()
    }
}

impl TrainingDataProvider for FeatureStore {
    fn get_training_data(&self, use_case: &UseCase) -> Result<TrainingData> {
        let features = feature_set(&self.state.historical, use_case)?.clone();
        let targets = self
            .state
            .targets
            .get(use_case)
            .cloned()
            .unwrap_or_default();
        Ok(TrainingData::new(features, targets))
    }
}

fn feature_set<'a>(
    sets: &'a HashMap<UseCase, FeatureSet>,
    use_case: &UseCase,
) -> Result<&'a FeatureSet> {
    sets.get(use_case)
        .ok_or_else(|| ServiceError::FeatureSetNotFound {
            use_case: use_case.clone(),
        })
}

fn user_features(
    sets: &HashMap<UseCase, FeatureSet>,
    user_id: &UserId,
    use_case: &UseCase,
) -> Result<FeatureVector> {
    feature_set(sets, use_case)?
        .get(user_id)
        .cloned()
        .ok_or_else(|| ServiceError::UserNotFound {
            use_case: use_case.clone(),
            user_id: user_id.clone(),
        })
}
