//! Persisted prediction pipeline: one-hot encoding, standard scaling and a
//! random-forest classifier, evaluated in that order.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::schema::FeatureValue;

/// Categorical column encoded one-hot with its first category dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotColumn {
    pub column: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

/// The artifact as stored on disk and in the remote container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub categorical: Vec<OneHotColumn>,
    pub numerical: Vec<String>,
    pub scaler: StandardScaler,
    pub forest: RandomForest,
}

/// Named columns handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<FeatureValue>>,
}

impl FeatureFrame {
    fn column(&self, name: &str) -> Result<usize, ModelError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ModelError::MissingFeature(name.to_string()))
    }
}

impl Pipeline {
    /// Width of the vector the scaler and trees operate on.
    pub fn encoded_width(&self) -> usize {
        let encoded: usize = self
            .categorical
            .iter()
            .map(|c| c.categories.len().saturating_sub(1))
            .sum();
        encoded + self.numerical.len()
    }

    /// Structural checks run once at load time so inference never indexes out
    /// of bounds.
    pub fn check(&self) -> Result<(), ModelError> {
        let width = self.encoded_width();
        let invalid = |msg: String| Err(ModelError::InvalidArtifact(msg));

        if self.scaler.mean.len() != width || self.scaler.scale.len() != width {
            return invalid(format!(
                "scaler has {}/{} entries, expected {width}",
                self.scaler.mean.len(),
                self.scaler.scale.len()
            ));
        }
        if self.forest.classes.is_empty() {
            return invalid("forest has no classes".to_string());
        }
        if self.forest.trees.is_empty() {
            return invalid("forest has no trees".to_string());
        }

        let n_classes = self.forest.classes.len();
        for (t, tree) in self.forest.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return invalid(format!("tree {t} is empty"));
            }
            for (n, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        if *feature >= width {
                            return invalid(format!(
                                "tree {t} node {n}: feature {feature} out of range"
                            ));
                        }
                        // Children must point forward, which also rules out cycles.
                        let len = tree.nodes.len();
                        if *left <= n || *right <= n || *left >= len || *right >= len {
                            return invalid(format!("tree {t} node {n}: bad child index"));
                        }
                    }
                    TreeNode::Leaf { value } => {
                        if value.len() != n_classes {
                            return invalid(format!(
                                "tree {t} node {n}: leaf has {} values, expected {n_classes}",
                                value.len()
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Encode then scale a frame into the model's input space.
    pub fn transform(&self, frame: &FeatureFrame) -> Result<Vec<Vec<f64>>, ModelError> {
        let cat_columns = self
            .categorical
            .iter()
            .map(|c| frame.column(&c.column))
            .collect::<Result<Vec<_>, _>>()?;
        let num_columns = self
            .numerical
            .iter()
            .map(|name| frame.column(name))
            .collect::<Result<Vec<_>, _>>()?;

        let width = self.encoded_width();
        let mut out = Vec::with_capacity(frame.rows.len());
        for row in &frame.rows {
            let mut encoded = Vec::with_capacity(width);

            for (spec, &idx) in self.categorical.iter().zip(&cat_columns) {
                let label = match &row[idx] {
                    FeatureValue::Category(s) => s.clone(),
                    FeatureValue::Number(v) => v.to_string(),
                };
                // Unknown categories encode as all zeros.
                for category in spec.categories.iter().skip(1) {
                    encoded.push(if *category == label { 1.0 } else { 0.0 });
                }
            }

            for (name, &idx) in self.numerical.iter().zip(&num_columns) {
                match &row[idx] {
                    FeatureValue::Number(v) => encoded.push(*v),
                    FeatureValue::Category(_) => {
                        return Err(ModelError::InvalidArtifact(format!(
                            "column {name} is declared numerical but holds text"
                        )))
                    }
                }
            }

            for (i, x) in encoded.iter_mut().enumerate() {
                let scale = if self.scaler.scale[i] == 0.0 {
                    1.0
                } else {
                    self.scaler.scale[i]
                };
                *x = (*x - self.scaler.mean[i]) / scale;
            }
            out.push(encoded);
        }
        Ok(out)
    }

    /// Predict one class label per row.
    pub fn predict(&self, frame: &FeatureFrame) -> Result<Vec<i64>, ModelError> {
        let matrix = self.transform(frame)?;
        Ok(matrix.iter().map(|x| self.forest.predict_one(x)).collect())
    }
}

impl RandomForest {
    /// Mean of per-tree class distributions; ties go to the lowest class index.
    pub fn predict_one(&self, x: &[f64]) -> i64 {
        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.leaf(x);
            let total: f64 = leaf.iter().sum();
            if total > 0.0 {
                for (p, v) in proba.iter_mut().zip(leaf) {
                    *p += v / total;
                }
            }
        }

        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        self.classes[best]
    }
}

impl DecisionTree {
    fn leaf(&self, x: &[f64]) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}
