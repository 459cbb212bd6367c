//! Heart-attack classifier
//!
//! - [`Classifier`] - model backend seam
//! - [`forest`] - random forest read from a JSON artifact
//! - [`ClassifierAdapter`] - loads the artifacts, orders features, predicts

pub mod forest;

pub use forest::RandomForest;

use super::features::FeatureSet;
use crate::domain::{PredictionError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// A binary classification model
///
/// Class 0 is negative and class 1 is positive.
pub trait Classifier: Send + Sync {
    /// Short identifier used in logs
    fn backend_name(&self) -> &str;

    /// Length of the input vector the model expects
    fn n_features(&self) -> usize;

    /// Input order declared by the model itself, if any
    fn feature_names(&self) -> Option<&[String]>;

    /// Class probabilities `[negative, positive]` for one sample
    fn predict_proba(&self, x: &[f64]) -> Result<[f64; 2]>;
}

/// Outcome of classifying one entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// 0 = negative, 1 = positive
    pub label: u8,
    /// `[p_negative, p_positive]`
    pub probabilities: [f64; 2],
    /// Probability of the chosen label, as a percentage
    pub confidence: f64,
}

impl Prediction {
    /// Ties go to the negative class
    pub fn from_probabilities(probabilities: [f64; 2]) -> Self {
        let label = if probabilities[1] > probabilities[0] {
            1
        } else {
            0
        };
        Self {
            label,
            probabilities,
            confidence: probabilities[0].max(probabilities[1]) * 100.0,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.label == 1
    }

    pub fn positive_probability(&self) -> f64 {
        self.probabilities[1]
    }
}

/// Model plus the feature order it was trained on
pub struct ClassifierAdapter {
    model: Box<dyn Classifier>,
    feature_order: Vec<String>,
}

impl std::fmt::Debug for ClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierAdapter")
            .field("backend", &self.model.backend_name())
            .field("feature_order", &self.feature_order)
            .finish()
    }
}

fn read_artifact(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PredictionError::MissingArtifact {
            path: path.display().to_string(),
        }
        .into());
    }
    std::fs::read_to_string(path).map_err(|e| {
        PredictionError::InvalidArtifact {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Parses a feature-name artifact: a JSON array of distinct strings
fn parse_feature_names(json: &str, path: &str) -> Result<Vec<String>> {
    let invalid = |message: String| PredictionError::InvalidArtifact {
        path: path.to_string(),
        message,
    };

    let names: Vec<String> = serde_json::from_str(json).map_err(|e| invalid(e.to_string()))?;
    if names.is_empty() {
        return Err(invalid("feature name list is empty".to_string()).into());
    }
    let distinct: BTreeSet<&String> = names.iter().collect();
    if distinct.len() != names.len() {
        return Err(invalid("feature name list contains duplicates".to_string()).into());
    }
    Ok(names)
}

impl ClassifierAdapter {
    /// Loads the model and feature-name artifacts from disk
    ///
    /// # Errors
    ///
    /// - `MissingArtifact` if either file is absent
    /// - `InvalidArtifact` if either file can't be read or parsed
    /// - `ShapeMismatch` if the feature names disagree with the model
    pub fn load(model_path: impl AsRef<Path>, feature_names_path: impl AsRef<Path>) -> Result<Self> {
        let model_path = model_path.as_ref();
        let names_path = feature_names_path.as_ref();

        let model_json = read_artifact(model_path)?;
        let model = RandomForest::from_json(&model_json, &model_path.display().to_string())?;

        let names_json = read_artifact(names_path)?;
        let names = parse_feature_names(&names_json, &names_path.display().to_string())?;

        tracing::debug!(
            model = %model_path.display(),
            trees = model.trees.len(),
            features = model.n_features,
            "Loaded classifier artifacts"
        );

        Self::new(Box::new(model), names)
    }

    /// Pairs a model with a feature-name list
    ///
    /// The model's own declared order wins when it has one; the list then
    /// only has to name the same set.
    pub fn new(model: Box<dyn Classifier>, feature_names: Vec<String>) -> Result<Self> {
        let feature_order = match model.feature_names() {
            Some(declared) => {
                let declared_set: BTreeSet<&String> = declared.iter().collect();
                let file_set: BTreeSet<&String> = feature_names.iter().collect();
                if declared_set != file_set {
                    return Err(PredictionError::ShapeMismatch {
                        expected: format!("model features {declared:?}"),
                        actual: format!("feature names {feature_names:?}"),
                    }
                    .into());
                }
                declared.to_vec()
            }
            None => feature_names,
        };

        if feature_order.len() != model.n_features() {
            return Err(PredictionError::ShapeMismatch {
                expected: format!("{} features", model.n_features()),
                actual: format!("{} feature names", feature_order.len()),
            }
            .into());
        }

        Ok(Self {
            model,
            feature_order,
        })
    }

    pub fn feature_order(&self) -> &[String] {
        &self.feature_order
    }

    pub fn backend_name(&self) -> &str {
        self.model.backend_name()
    }

    /// Classifies one entry
    ///
    /// # Errors
    ///
    /// `UnknownFeature` if the set lacks a name the model needs.
    pub fn predict(&self, features: &FeatureSet) -> Result<Prediction> {
        let x = features.ordered(&self.feature_order)?;
        let probabilities = self.model.predict_proba(&x)?;
        Ok(Prediction::from_probabilities(probabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HeartwatchError;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use test_case::test_case;

    /// Splits on `b` only: b <= 1 is negative-leaning
    const MODEL_WITH_NAMES: &str = r#"{
        "n_features": 2,
        "feature_names_in": ["a", "b"],
        "trees": [{"nodes": [
            {"feature": 1, "threshold": 1.0, "left": 1, "right": 2},
            {"value": [4.0, 1.0]},
            {"value": [1.0, 3.0]}
        ]}]
    }"#;

    const MODEL_WITHOUT_NAMES: &str = r#"{
        "n_features": 2,
        "trees": [{"nodes": [
            {"feature": 1, "threshold": 1.0, "left": 1, "right": 2},
            {"value": [4.0, 1.0]},
            {"value": [1.0, 3.0]}
        ]}]
    }"#;

    fn temp_json(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn features(a: f64, b: f64) -> FeatureSet {
        [("a".to_string(), a), ("b".to_string(), b)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_prediction_confidence_and_ties() {
        let p = Prediction::from_probabilities([0.25, 0.75]);
        assert_eq!(p.label, 1);
        assert!((p.confidence - 75.0).abs() < 1e-9);

        let tie = Prediction::from_probabilities([0.5, 0.5]);
        assert_eq!(tie.label, 0);
        assert!((tie.confidence - 50.0).abs() < 1e-9);
    }

    #[test_case([0.0, 1.0], 1, 100.0 ; "certain positive")]
    #[test_case([1.0, 0.0], 0, 100.0 ; "certain negative")]
    #[test_case([0.5, 0.5], 0, 50.0 ; "tie")]
    #[test_case([0.62, 0.38], 0, 62.0 ; "asymmetric negative")]
    #[test_case([0.13, 0.87], 1, 87.0 ; "asymmetric positive")]
    #[test_case([0.499, 0.501], 1, 50.1 ; "near tie")]
    fn test_confidence_stays_within_bounds(probabilities: [f64; 2], label: u8, confidence: f64) {
        let p = Prediction::from_probabilities(probabilities);
        assert_eq!(p.label, label);
        assert!((p.confidence - confidence).abs() < 1e-9);
        assert!((50.0..=100.0).contains(&p.confidence));
    }

    #[test]
    fn test_model_order_wins_over_file_order() {
        let model = temp_json(MODEL_WITH_NAMES);
        let names = temp_json(r#"["b", "a"]"#);

        let adapter = ClassifierAdapter::load(model.path(), names.path()).unwrap();
        assert_eq!(adapter.feature_order(), ["a", "b"]);

        let prediction = adapter.predict(&features(0.0, 5.0)).unwrap();
        assert_eq!(prediction.label, 1);
        assert!((prediction.probabilities[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_file_order_used_without_declared_names() {
        let model = temp_json(MODEL_WITHOUT_NAMES);
        // model splits on index 1, which is now "a"
        let names = temp_json(r#"["b", "a"]"#);

        let adapter = ClassifierAdapter::load(model.path(), names.path()).unwrap();
        let prediction = adapter.predict(&features(0.0, 5.0)).unwrap();
        assert_eq!(prediction.label, 0);
        assert!((prediction.probabilities[0] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_missing_model_file() {
        let names = temp_json(r#"["a", "b"]"#);
        let err = ClassifierAdapter::load("no/such/model.json", names.path()).unwrap_err();
        match err {
            HeartwatchError::Prediction(PredictionError::MissingArtifact { path }) => {
                assert!(path.contains("model.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_feature_names_file() {
        let model = temp_json(MODEL_WITH_NAMES);
        let names = temp_json(r#"{"a": 1}"#);
        let err = ClassifierAdapter::load(model.path(), names.path()).unwrap_err();
        assert!(matches!(
            err,
            HeartwatchError::Prediction(PredictionError::InvalidArtifact { .. })
        ));
    }

    #[test]
    fn test_name_set_mismatch() {
        let model = temp_json(MODEL_WITH_NAMES);
        let names = temp_json(r#"["a", "c"]"#);
        let err = ClassifierAdapter::load(model.path(), names.path()).unwrap_err();
        assert!(matches!(
            err,
            HeartwatchError::Prediction(PredictionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_name_count_mismatch() {
        let model = temp_json(MODEL_WITHOUT_NAMES);
        let names = temp_json(r#"["a", "b", "c"]"#);
        let err = ClassifierAdapter::load(model.path(), names.path()).unwrap_err();
        assert!(matches!(
            err,
            HeartwatchError::Prediction(PredictionError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_feature() {
        let model = temp_json(MODEL_WITH_NAMES);
        let names = temp_json(r#"["a", "b"]"#);
        let adapter = ClassifierAdapter::load(model.path(), names.path()).unwrap();

        let partial: FeatureSet = [("a".to_string(), 1.0)].into_iter().collect();
        let err = adapter.predict(&partial).unwrap_err();
        match err {
            HeartwatchError::Prediction(PredictionError::UnknownFeature(name)) => {
                assert_eq!(name, "b")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
