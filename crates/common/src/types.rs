use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single top-level dispatch through the message bus.
///
/// Wraps a UUID so log lines and spans from one dispatch can be correlated
/// without mixing them up with other UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DispatchId(Uuid);

impl DispatchId {
    /// Creates a new random dispatch ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DispatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DispatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// A named ML application context (e.g. `"churn-risk"`).
    ///
    /// Models, features and targets are all scoped to one use-case.
    UseCase
);

string_id!(
    /// Identifier of the user a prediction is made for.
    UserId
);

/// Name of a single feature inside a [`FeatureVector`].
pub type FeatureName = String;

/// Feature name to numeric value, for one user under one use-case.
pub type FeatureVector = BTreeMap<FeatureName, f64>;

/// User to feature vector, scoped to one use-case.
pub type FeatureSet = BTreeMap<UserId, FeatureVector>;

/// The observed outcome a model is trained towards.
pub type Target = f64;

/// User to training target, scoped to one use-case.
pub type Targets = BTreeMap<UserId, Target>;

/// Historical features paired with the targets a trainer fits against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    /// Historical feature vectors, keyed by user.
    pub features: FeatureSet,

    /// Observed targets, keyed by user.
    pub targets: Targets,
}

impl TrainingData {
    /// Creates training data from features and targets.
    pub fn new(features: FeatureSet, targets: Targets) -> Self {
        Self { features, targets }
    }

    /// Returns the users with historical features, in ascending order.
    pub fn user_ids(&self) -> impl Iterator<Item = &UserId> {
        self.features.keys()
    }

    /// Returns true if there are no historical features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_id_new_creates_unique_ids() {
        let id1 = DispatchId::new();
        let id2 = DispatchId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn dispatch_id_displays_as_its_serialized_uuid() {
        let id = DispatchId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }

    #[test]
    fn use_case_serializes_as_plain_string() {
        let use_case = UseCase::new("churn-risk");
        let json = serde_json::to_string(&use_case).unwrap();
        assert_eq!(json, "\"churn-risk\"");
    }

    #[test]
    fn feature_set_keys_by_user_id() {
        let json = r#"{"user-1": {"watch_count": 10.0}}"#;
        let set: FeatureSet = serde_json::from_str(json).unwrap();

        let vector = set.get(&UserId::new("user-1")).unwrap();
        assert_eq!(vector.get("watch_count"), Some(&10.0));
    }

    #[test]
    fn training_data_lists_users_in_order() {
        let mut features = FeatureSet::new();
        features.insert(UserId::new("b"), FeatureVector::new());
        features.insert(UserId::new("a"), FeatureVector::new());
        let data = TrainingData::new(features, Targets::new());

        let users: Vec<&str> = data.user_ids().map(UserId::as_str).collect();
        assert_eq!(users, vec!["a", "b"]);
        assert!(!data.is_empty());
    }
}
