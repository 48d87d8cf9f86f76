//! Random forest artifact
//!
//! JSON export of a fitted tree ensemble:
//!
//! ```json
//! {
//!   "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
//!   "classes": ["maize", "rice"],
//!   "trees": [
//!     {"Split": {"feature": 6, "threshold": 150.0,
//!                "left":  {"Leaf": {"class_counts": [12.0, 1.0]}},
//!                "right": {"Leaf": {"class_counts": [0.0, 20.0]}}}}
//!   ]
//! }
//! ```
//!
//! Routing follows the usual convention (`x[feature] <= threshold` goes left).
//! Leaf counts are normalized per tree and averaged across trees (soft voting);
//! ties resolve to the lowest class index.

use super::{CropModel, ModelInput};
use crate::error::ModelLoadError;
use crate::features::FeatureVector;
use crate::schema::FEATURE_COUNT;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Terminal node with per-class training sample counts
    Leaf { class_counts: Vec<f64> },
    /// Internal node with split
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    fn leaf_counts(&self, row: &[f64]) -> &[f64] {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { class_counts } => return class_counts,
                TreeNode::Split { feature, threshold, left, right } => {
                    node = if row[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    fn check(&self, n_classes: usize) -> Result<(), ModelLoadError> {
        match self {
            TreeNode::Leaf { class_counts } => {
                if class_counts.len() != n_classes {
                    return Err(ModelLoadError::Invalid(format!(
                        "leaf has {} class counts, expected {}",
                        class_counts.len(),
                        n_classes
                    )));
                }
                if class_counts.iter().any(|c| !c.is_finite() || *c < 0.0) {
                    return Err(ModelLoadError::Invalid(
                        "leaf class counts must be finite and non-negative".to_string(),
                    ));
                }
                let total: f64 = class_counts.iter().sum();
                if !total.is_finite() {
                    return Err(ModelLoadError::Invalid(
                        "leaf class count total overflows".to_string(),
                    ));
                }
                if total <= 0.0 {
                    return Err(ModelLoadError::Invalid("leaf has no samples".to_string()));
                }
                Ok(())
            }
            TreeNode::Split { feature, threshold, left, right } => {
                if *feature >= FEATURE_COUNT {
                    return Err(ModelLoadError::Invalid(format!(
                        "split on feature index {} (only {} features)",
                        feature, FEATURE_COUNT
                    )));
                }
                if !threshold.is_finite() {
                    return Err(ModelLoadError::Invalid(
                        "split threshold must be finite".to_string(),
                    ));
                }
                left.check(n_classes)?;
                right.check(n_classes)
            }
        }
    }
}

/// Fitted tree ensemble classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    /// Empty when the export did not record column names
    #[serde(default)]
    feature_names: Vec<String>,
    classes: Vec<String>,
    trees: Vec<TreeNode>,
}

impl TreeEnsemble {
    /// Build and validate an ensemble from parts
    pub fn new(
        feature_names: Vec<String>,
        classes: Vec<String>,
        trees: Vec<TreeNode>,
    ) -> Result<Self, ModelLoadError> {
        let model = Self { feature_names, classes, trees };
        model.check()?;
        Ok(model)
    }

    /// Load a JSON artifact from disk
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let model: Self = serde_json::from_reader(reader)?;
        model.check()?;
        tracing::info!(
            "Loaded tree ensemble from {:?} ({} trees, {} classes)",
            path,
            model.trees.len(),
            model.classes.len()
        );
        Ok(model)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ModelLoadError> {
        let model: Self = serde_json::from_str(json)?;
        model.check()?;
        Ok(model)
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class probabilities across trees for one row
    pub fn predict_proba(&self, row: &FeatureVector) -> Vec<f64> {
        let n_classes = self.classes.len();
        let values = row.as_slice();

        let mut proba = self
            .trees
            .par_iter()
            .map(|tree| {
                let counts = tree.leaf_counts(values);
                let total: f64 = counts.iter().sum();
                counts.iter().map(|c| c / total).collect::<Vec<f64>>()
            })
            .reduce(
                || vec![0.0; n_classes],
                |mut acc, p| {
                    acc.iter_mut().zip(p).for_each(|(a, b)| *a += b);
                    acc
                },
            );

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        proba
    }

    /// Most probable class for one row
    pub fn predict_row(&self, row: &FeatureVector) -> &str {
        let proba = self.predict_proba(row);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        &self.classes[best]
    }

    fn check(&self) -> Result<(), ModelLoadError> {
        if self.classes.is_empty() {
            return Err(ModelLoadError::Invalid("model has no classes".to_string()));
        }
        if self.trees.is_empty() {
            return Err(ModelLoadError::Invalid("model has no trees".to_string()));
        }
        for tree in &self.trees {
            tree.check(self.classes.len())?;
        }
        Ok(())
    }
}

impl CropModel for TreeEnsemble {
    fn predict(&self, input: &ModelInput<'_>) -> anyhow::Result<Vec<String>> {
        Ok(input
            .rows
            .iter()
            .map(|row| self.predict_row(row).to_string())
            .collect())
    }

    fn feature_names(&self) -> Option<&[String]> {
        if self.feature_names.is_empty() {
            None
        } else {
            Some(&self.feature_names)
        }
    }
}
