//! Classifier Adapter
//!
//! Two seams:
//! - `CropModel`: the opaque, externally trained model. It sees a named,
//!   ordered table of rows and answers with one label per row.
//! - `Classifier`: what the pipeline calls. One vector in, one label out.
//!
//! `ModelAdapter` bridges the two, so tests can stub either side.

pub mod forest;

pub use forest::{TreeEnsemble, TreeNode};

use crate::error::InferenceError;
use crate::features::FeatureVector;
use crate::schema::FEATURE_NAMES;

/// Predicted crop name, case as trained (e.g. "rice")
pub type CropLabel = String;

/// Capability the pipeline depends on
pub trait Classifier: Send + Sync {
    fn classify(&self, vector: &FeatureVector) -> Result<CropLabel, InferenceError>;
}

/// Structured model input: named columns in training order plus rows
#[derive(Debug, Clone, Copy)]
pub struct ModelInput<'a> {
    pub columns: &'static [&'static str],
    pub rows: &'a [FeatureVector],
}

impl<'a> ModelInput<'a> {
    pub fn new(rows: &'a [FeatureVector]) -> Self {
        Self {
            columns: &FEATURE_NAMES,
            rows,
        }
    }
}

/// Opaque pre-trained model contract
pub trait CropModel: Send + Sync {
    /// One label per input row
    fn predict(&self, input: &ModelInput<'_>) -> anyhow::Result<Vec<String>>;

    /// Column names the model was fitted on, if it records them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }
}

/// Wraps a `CropModel` as a single-vector `Classifier`
pub struct ModelAdapter<M> {
    model: M,
}

impl<M: CropModel> ModelAdapter<M> {
    /// Wrap a model, rejecting schema-aware models fitted on other columns
    pub fn new(model: M) -> Result<Self, InferenceError> {
        if let Some(found) = model.feature_names() {
            let matches = found.len() == FEATURE_NAMES.len()
                && found.iter().zip(FEATURE_NAMES).all(|(a, b)| a == b);
            if !matches {
                return Err(InferenceError::FeatureMismatch {
                    expected: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                    found: found.to_vec(),
                });
            }
        }
        Ok(Self { model })
    }
}

impl<M: CropModel> Classifier for ModelAdapter<M> {
    fn classify(&self, vector: &FeatureVector) -> Result<CropLabel, InferenceError> {
        let rows = [*vector];
        let predictions = self
            .model
            .predict(&ModelInput::new(&rows))
            .map_err(|e| InferenceError::Model(format!("{:#}", e)))?;

        let label = predictions
            .into_iter()
            .next()
            .ok_or(InferenceError::EmptyPrediction)?;

        if label.trim().is_empty() {
            return Err(InferenceError::BlankLabel);
        }
        Ok(label)
    }
}
