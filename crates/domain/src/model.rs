//! Predictor value objects.

use std::collections::BTreeMap;

use common::{FeatureName, FeatureVector, Target};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A model that can be published to inference.
///
/// The set of kinds is closed: inference decides whether to look features up
/// by asking [`Model::requires_features`], and only [`LinearModel`] can be
/// trained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    /// Always predicts the same value.
    Constant(ConstantModel),

    /// Threshold rules evaluated in order.
    Rules(RulesModel),

    /// Weighted sum of features, updated by training.
    Linear(LinearModel),
}

impl Model {
    /// Returns the model kind name.
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Constant(_) => "constant",
            Model::Rules(_) => "rules",
            Model::Linear(_) => "linear",
        }
    }

    /// Returns true if predicting needs the user's feature vector.
    pub fn requires_features(&self) -> bool {
        !matches!(self, Model::Constant(_))
    }

    /// Predicts a value for the given features.
    ///
    /// Constant models ignore the features entirely.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        match self {
            Model::Constant(model) => Ok(model.predict()),
            Model::Rules(model) => model.predict(features),
            Model::Linear(model) => model.predict(features),
        }
    }

    /// Returns the trainable form of this model, if it has one.
    pub fn as_trainable_mut(&mut self) -> Option<&mut LinearModel> {
        match self {
            Model::Linear(model) => Some(model),
            _ => None,
        }
    }
}

impl From<ConstantModel> for Model {
    fn from(model: ConstantModel) -> Self {
        Model::Constant(model)
    }
}

impl From<RulesModel> for Model {
    fn from(model: RulesModel) -> Self {
        Model::Rules(model)
    }
}

impl From<LinearModel> for Model {
    fn from(model: LinearModel) -> Self {
        Model::Linear(model)
    }
}

/// A model that predicts a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantModel {
    /// The value returned for every user.
    pub prediction: f64,
}

impl ConstantModel {
    /// Creates a constant model.
    pub fn new(prediction: f64) -> Self {
        Self { prediction }
    }

    /// Returns the fixed prediction.
    pub fn predict(&self) -> f64 {
        self.prediction
    }
}

/// A single threshold rule: fires when `feature >= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Feature the rule inspects.
    pub feature: FeatureName,

    /// Inclusive lower bound for the rule to fire.
    pub threshold: f64,

    /// Prediction produced when the rule fires.
    pub prediction: f64,
}

impl Rule {
    /// Creates a new rule.
    pub fn new(feature: impl Into<FeatureName>, threshold: f64, prediction: f64) -> Self {
        Self {
            feature: feature.into(),
            threshold,
            prediction,
        }
    }
}

/// Ordered threshold rules with a fallback prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesModel {
    /// Rules checked in order; the first that fires wins.
    pub rules: Vec<Rule>,

    /// Prediction used when no rule fires.
    pub fallback: f64,
}

impl RulesModel {
    /// Creates a rules model with no rules.
    pub fn new(fallback: f64) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Appends a rule, returning the updated model.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Evaluates the rules against a feature vector.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        for rule in &self.rules {
            let value = feature_value(features, &rule.feature)?;
            if value >= rule.threshold {
                return Ok(rule.prediction);
            }
        }
        Ok(self.fallback)
    }
}

fn default_learning_rate() -> f64 {
    LinearModel::DEFAULT_LEARNING_RATE
}

/// A linear model over named features.
///
/// Prediction is `bias + sum(weight * feature)` over every weighted feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    /// Weight per feature name.
    #[serde(default)]
    pub weights: BTreeMap<FeatureName, f64>,

    /// Intercept term.
    #[serde(default)]
    pub bias: f64,

    /// Step size used by [`LinearModel::update_weights`].
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

impl LinearModel {
    /// Learning rate used when none is given.
    pub const DEFAULT_LEARNING_RATE: f64 = 0.01;

    /// Creates an untrained model with the given learning rate.
    pub fn new(learning_rate: f64) -> Result<Self> {
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(ModelError::InvalidLearningRate(learning_rate));
        }
        Ok(Self {
            weights: BTreeMap::new(),
            bias: 0.0,
            learning_rate,
        })
    }

    /// Sets a feature weight, returning the updated model.
    pub fn with_weight(mut self, feature: impl Into<FeatureName>, weight: f64) -> Self {
        self.weights.insert(feature.into(), weight);
        self
    }

    /// Sets the bias, returning the updated model.
    pub fn with_bias(mut self, bias: f64) -> Self {
        self.bias = bias;
        self
    }

    /// Predicts from a feature vector.
    ///
    /// Every weighted feature must be present in `features`.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        self.weights
            .iter()
            .try_fold(self.bias, |acc, (name, weight)| {
                Ok(acc + weight * feature_value(features, name)?)
            })
    }

    /// Applies one gradient step on squared error towards `target`.
    ///
    /// Features seen for the first time start with a zero weight.
    pub fn update_weights(&mut self, features: &FeatureVector, target: Target) -> Result<()> {
        for name in features.keys() {
            self.weights.entry(name.clone()).or_insert(0.0);
        }

        let step = self.learning_rate * (self.predict(features)? - target);
        for (name, weight) in self.weights.iter_mut() {
            let value = features.get(name).copied().unwrap_or_default();
            *weight -= step * value;
        }
        self.bias -= step;

        Ok(())
    }
}

impl Default for LinearModel {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            bias: 0.0,
            learning_rate: Self::DEFAULT_LEARNING_RATE,
        }
    }
}

fn feature_value(features: &FeatureVector, name: &str) -> Result<f64> {
    features
        .get(name)
        .copied()
        .ok_or_else(|| ModelError::MissingFeature {
            feature: name.to_string(),
        })
}
