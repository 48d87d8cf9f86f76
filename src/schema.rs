//! Feature Schema
//!
//! The seven soil/climate inputs the crop classifier was trained on, in
//! training column order. Every consumer walks `Feature::ALL` so the order
//! lives in exactly one place.

use serde::{Deserialize, Serialize};

/// Number of model inputs
pub const FEATURE_COUNT: usize = 7;

/// Column names in training order (also the form field keys, case-sensitive)
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"];

/// One model input column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    Nitrogen,    // N
    Phosphorus,  // P
    Potassium,   // K
    Temperature, // °C
    Humidity,    // %
    Ph,
    Rainfall,    // mm
}

impl Feature {
    /// All features in training column order
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Rainfall,
    ];

    /// Raw input key / model column name
    pub fn name(self) -> &'static str {
        FEATURE_NAMES[self.index()]
    }

    /// Position in the feature vector
    pub fn index(self) -> usize {
        match self {
            Feature::Nitrogen => 0,
            Feature::Phosphorus => 1,
            Feature::Potassium => 2,
            Feature::Temperature => 3,
            Feature::Humidity => 4,
            Feature::Ph => 5,
            Feature::Rainfall => 6,
        }
    }

    /// Human-readable label for form rendering
    pub fn label(self) -> &'static str {
        match self {
            Feature::Nitrogen => "Nitrogen (N)",
            Feature::Phosphorus => "Phosphorus (P)",
            Feature::Potassium => "Potassium (K)",
            Feature::Temperature => "Temperature (°C)",
            Feature::Humidity => "Humidity (%)",
            Feature::Ph => "Soil pH",
            Feature::Rainfall => "Rainfall (mm)",
        }
    }
}
