pub mod errors;

use std::fs;
use serde::Deserialize;
use crate::manager_model::errors::ModelError;
use crate::models::feature_vector::{FeatureVector, ScaledFeatureVector, FEATURE_ORDER};

/// Frozen per-feature standardization statistics, fitted once by the
/// offline training pipeline and never refit per request.
#[derive(Deserialize, Debug)]
pub struct Scaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    /// Applies the affine transform (x - mean) / scale per feature
    pub fn transform(&self, features: &FeatureVector) -> ScaledFeatureVector {
        let raw = features.as_array();
        let mut scaled = [0.0; 5];
        for (i, value) in raw.iter().enumerate() {
            scaled[i] = (value - self.mean[i]) / self.scale[i];
        }

        scaled
    }
}

/// One fitted regression tree in flattened array form: for node i,
/// children_left[i] < 0 marks a leaf whose output is value[i], otherwise
/// the node splits on feature[i] at threshold[i].
#[derive(Deserialize, Debug)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    fn predict(&self, features: &ScaledFeatureVector) -> f64 {
        let mut node = 0usize;
        while self.children_left[node] >= 0 {
            if features[self.feature[node] as usize] <= self.threshold[node] {
                node = self.children_left[node] as usize;
            } else {
                node = self.children_right[node] as usize;
            }
        }

        self.value[node]
    }

    /// Structural checks that make the later walk panic free: array lengths
    /// agree, split features index a known column and children always point
    /// forward (which also guarantees termination).
    fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        let n = self.children_left.len();
        if self.children_right.len() != n || self.feature.len() != n
            || self.threshold.len() != n || self.value.len() != n {
            return Err(ModelError("tree node arrays differ in length".to_string()));
        }
        if n == 0 {
            return Err(ModelError("tree has no nodes".to_string()));
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left < 0 {
                continue;
            }
            if right < 0 {
                return Err(ModelError(format!("node {} has a left child but no right child", i)));
            }
            if left as usize >= n || right as usize >= n || left <= i as i64 || right <= i as i64 {
                return Err(ModelError(format!("node {} has out of order children", i)));
            }
            if self.feature[i] < 0 || self.feature[i] as usize >= n_features {
                return Err(ModelError(format!("node {} splits on unknown feature {}", i, self.feature[i])));
            }
        }

        Ok(())
    }
}

/// The fitted random forest regressor: prediction is the mean of the
/// per-tree outputs. The internal structure is otherwise opaque to the
/// service.
#[derive(Deserialize, Debug)]
pub struct RandomForest {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn predict(&self, features: &ScaledFeatureVector) -> f64 {
        let sum = self.trees.iter().map(|t| t.predict(features)).sum::<f64>();

        sum / self.trees.len() as f64
    }
}

/// Immutable handle over the two fitted artifacts, loaded once at startup
/// and shared read only between requests.
#[derive(Debug)]
pub struct ModelHandle {
    scaler: Scaler,
    forest: RandomForest,
}

impl ModelHandle {
    /// Builds a handle from already deserialized artifacts, cross checking
    /// them against the service's feature contract.
    ///
    /// The scaler must declare exactly the feature names and order the
    /// service builds its vectors with. The original deployment relied on
    /// convention here, which made an order mismatch a silent scoring bug,
    /// so it is rejected at construction instead.
    ///
    /// # Arguments
    ///
    /// * 'scaler' - the fitted standardization statistics
    /// * 'forest' - the fitted random forest
    pub fn new(scaler: Scaler, forest: RandomForest) -> Result<ModelHandle, ModelError> {
        if scaler.feature_names != FEATURE_ORDER {
            return Err(ModelError(format!(
                "scaler was fitted with features [{}], expected [{}]",
                scaler.feature_names.join(", "), FEATURE_ORDER.join(", "))));
        }
        if scaler.mean.len() != FEATURE_ORDER.len() || scaler.scale.len() != FEATURE_ORDER.len() {
            return Err(ModelError("scaler statistics length mismatch".to_string()));
        }
        if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
            return Err(ModelError("scaler contains a zero or non-finite scale".to_string()));
        }

        if forest.n_features != FEATURE_ORDER.len() {
            return Err(ModelError(format!(
                "forest was fitted with {} features, expected {}",
                forest.n_features, FEATURE_ORDER.len())));
        }
        if forest.trees.is_empty() {
            return Err(ModelError("forest has no trees".to_string()));
        }
        for tree in &forest.trees {
            tree.validate(forest.n_features)?;
        }

        Ok(ModelHandle { scaler, forest })
    }

    /// Loads and cross checks the scaler and forest artifact files
    ///
    /// # Arguments
    ///
    /// * 'scaler_path' - path to the serialized scaler
    /// * 'model_path' - path to the serialized forest
    pub fn load(scaler_path: &str, model_path: &str) -> Result<ModelHandle, ModelError> {
        let scaler: Scaler = serde_json::from_str(&fs::read_to_string(scaler_path)?)?;
        let forest: RandomForest = serde_json::from_str(&fs::read_to_string(model_path)?)?;

        ModelHandle::new(scaler, forest)
    }

    pub fn scale(&self, features: &FeatureVector) -> ScaledFeatureVector {
        self.scaler.transform(features)
    }

    pub fn predict(&self, scaled: &ScaledFeatureVector) -> f64 {
        self.forest.predict(scaled)
    }

    pub fn n_estimators(&self) -> usize {
        self.forest.trees.len()
    }
}
