//! Random-forest model read from a JSON artifact
//!
//! Artifact layout:
//!
//! ```json
//! {
//!   "model_type": "random_forest",
//!   "n_features": 8,
//!   "feature_names_in": ["Age", "Gender", "..."],
//!   "trees": [
//!     {"nodes": [
//!       {"feature": 7, "threshold": 0.014, "left": 1, "right": 2},
//!       {"value": [380.0, 20.0]},
//!       {"value": [5.0, 300.0]}
//!     ]}
//!   ]
//! }
//! ```
//!
//! Split nodes send a sample left when `x[feature] <= threshold`. Leaves hold
//! per-class sample counts (negative, positive). Node 0 is the root, and a
//! child index is always greater than its parent's.

use super::Classifier;
use crate::domain::{PredictionError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Node {
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

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, index: usize, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("tree {index} has no nodes"));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "tree {index} node {i} splits on feature {feature}, model has {n_features}"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("tree {index} node {i} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if *child <= i || *child >= self.nodes.len() {
                            return Err(format!(
                                "tree {index} node {i} has invalid child index {child}"
                            ));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if value.len() != 2 {
                        return Err(format!(
                            "tree {index} leaf {i} has {} class counts, expected 2",
                            value.len()
                        ));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(format!("tree {index} leaf {i} has invalid class counts"));
                    }
                    if value.iter().sum::<f64>() <= 0.0 {
                        return Err(format!("tree {index} leaf {i} is empty"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `x`
    fn leaf_distribution(&self, x: &[f64]) -> [f64; 2] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf { value } => {
                    let total = value[0] + value[1];
                    return [value[0] / total, value[1] / total];
                }
            }
        }
    }
}

/// Random-forest binary classifier
#[derive(Debug, Clone, Deserialize)]
pub struct RandomForest {
    #[serde(default = "default_model_type")]
    pub model_type: String,
    pub n_features: usize,
    #[serde(default)]
    pub feature_names_in: Option<Vec<String>>,
    pub trees: Vec<Tree>,
}

fn default_model_type() -> String {
    "random_forest".to_string()
}

impl RandomForest {
    /// Parses and validates an artifact; `path` is only used in messages
    pub fn from_json(json: &str, path: &str) -> Result<Self> {
        let invalid = |message: String| PredictionError::InvalidArtifact {
            path: path.to_string(),
            message,
        };

        let forest: RandomForest =
            serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;

        if forest.model_type != "random_forest" {
            return Err(invalid(format!("unsupported model_type '{}'", forest.model_type)).into());
        }
        if forest.n_features == 0 {
            return Err(invalid("n_features must be > 0".to_string()).into());
        }
        if forest.trees.is_empty() {
            return Err(invalid("model has no trees".to_string()).into());
        }
        if let Some(names) = &forest.feature_names_in {
            if names.len() != forest.n_features {
                return Err(invalid(format!(
                    "feature_names_in has {} names but n_features is {}",
                    names.len(),
                    forest.n_features
                ))
                .into());
            }
        }
        for (i, tree) in forest.trees.iter().enumerate() {
            tree.validate(i, forest.n_features).map_err(invalid)?;
        }

        Ok(forest)
    }
}

impl Classifier for RandomForest {
    fn backend_name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2]> {
        if x.len() != self.n_features {
            return Err(PredictionError::ShapeMismatch {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.len()),
            }
            .into());
        }

        let mut sum = [0.0, 0.0];
        for tree in &self.trees {
            let [neg, pos] = tree.leaf_distribution(x);
            sum[0] += neg;
            sum[1] += pos;
        }
        let n = self.trees.len() as f64;
        Ok([sum[0] / n, sum[1] / n])
    }
}
