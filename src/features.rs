//! Feature Vector Builder
//!
//! The classifier cannot detect a column permutation: a misordered vector
//! still yields a plausible crop, just the wrong one. Vectors are therefore
//! only ever built by walking `Feature::ALL`.

use crate::schema::{Feature, FEATURE_COUNT};
use crate::validation::FeatureValues;
use serde::Serialize;

/// Ordered model input, positionally aligned to `FEATURE_NAMES`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    /// (feature, value) pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.into_iter().zip(self.0.iter().copied())
    }
}

/// Assemble validated values into training column order
pub fn build_feature_vector(values: &FeatureValues) -> FeatureVector {
    let mut out = [0.0; FEATURE_COUNT];
    for feature in Feature::ALL {
        out[feature.index()] = values.get(feature);
    }
    FeatureVector(out)
}
