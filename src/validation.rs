//! Input Validator
//!
//! Projects the boundary's string-keyed form data into typed per-field values.
//! This is purely a syntactic gate: values are not range-checked, so negative
//! rainfall or a pH above 14 pass through to the classifier unchanged.

use crate::error::ValidationError;
use crate::schema::Feature;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw form submission: field name → unparsed string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    fields: HashMap<String, String>,
}

impl RawInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Raw value for an exact (case-sensitive) key
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<HashMap<String, String>> for RawInput {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Validated inputs, one typed value per schema field
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureValues {
    #[serde(rename = "N")]
    pub nitrogen: f64,
    #[serde(rename = "P")]
    pub phosphorus: f64,
    #[serde(rename = "K")]
    pub potassium: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl FeatureValues {
    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Nitrogen => self.nitrogen,
            Feature::Phosphorus => self.phosphorus,
            Feature::Potassium => self.potassium,
            Feature::Temperature => self.temperature,
            Feature::Humidity => self.humidity,
            Feature::Ph => self.ph,
            Feature::Rainfall => self.rainfall,
        }
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        let slot = match feature {
            Feature::Nitrogen => &mut self.nitrogen,
            Feature::Phosphorus => &mut self.phosphorus,
            Feature::Potassium => &mut self.potassium,
            Feature::Temperature => &mut self.temperature,
            Feature::Humidity => &mut self.humidity,
            Feature::Ph => &mut self.ph,
            Feature::Rainfall => &mut self.rainfall,
        };
        *slot = value;
    }
}

/// Validate every schema field, reporting the first failure in schema order.
///
/// Keys outside the schema are ignored.
pub fn validate(raw: &RawInput) -> Result<FeatureValues, ValidationError> {
    let mut values = FeatureValues::default();
    for feature in Feature::ALL {
        values.set(feature, parse_field(feature, raw.get(feature.name()))?);
    }
    Ok(values)
}

/// Parse one raw value; surrounding whitespace is tolerated, NaN/inf are not
fn parse_field(feature: Feature, raw: Option<&str>) -> Result<f64, ValidationError> {
    let raw = raw.ok_or(ValidationError::MissingField {
        field: feature.name(),
    })?;

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::InvalidNumber {
            field: feature.name(),
            value: raw.to_string(),
        }),
    }
}
