//! Crop Profile Registry
//!
//! Optimal growing ranges per crop, keyed by lower-cased label. The table is
//! assembled once at startup and shared read-only; unknown crops resolve to
//! an "N/A" profile instead of an error.

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Human-readable optimal ranges for one crop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropProfile {
    #[serde(rename = "temp")]
    pub temperature: Cow<'static, str>,
    pub ph: Cow<'static, str>,
    #[serde(rename = "rain")]
    pub rainfall: Cow<'static, str>,
}

/// Returned for labels missing from the table
pub static UNAVAILABLE: CropProfile = CropProfile {
    temperature: Cow::Borrowed("N/A"),
    ph: Cow::Borrowed("N/A"),
    rainfall: Cow::Borrowed("N/A"),
};

impl CropProfile {
    pub const fn new(temperature: &'static str, ph: &'static str, rainfall: &'static str) -> Self {
        Self {
            temperature: Cow::Borrowed(temperature),
            ph: Cow::Borrowed(ph),
            rainfall: Cow::Borrowed(rainfall),
        }
    }

    pub fn is_available(&self) -> bool {
        self != &UNAVAILABLE
    }
}

// ============================================================================
// EMBEDDED CROP TABLE
// ============================================================================

static BUILTIN_PROFILES: &[(&str, CropProfile)] = &[
    ("rice", CropProfile::new("22-30°C", "5-6.5", "150-300mm")),
    ("wheat", CropProfile::new("12-25°C", "6-7.5", "50-100mm")),
    ("maize", CropProfile::new("18-27°C", "5.5-7.5", "60-110mm")),
    ("cotton", CropProfile::new("21-30°C", "5.5-8.5", "50-100mm")),
    ("jute", CropProfile::new("24-37°C", "6-7.5", "150-250mm")),
    ("sugarcane", CropProfile::new("21-27°C", "6-7.5", "1100-1500mm")),
    ("coconut", CropProfile::new("20-30°C", "5-8", "1000-2000mm")),
    ("apple", CropProfile::new("21-24°C", "5.5-6.5", "100-125mm")),
    ("mango", CropProfile::new("24-27°C", "5.5-7.5", "89-158mm")),
    ("banana", CropProfile::new("26-30°C", "6-7.5", "200-250mm")),
    ("grapes", CropProfile::new("15-40°C", "5.5-6.5", "50-70mm")),
    ("watermelon", CropProfile::new("21-29°C", "6-6.8", "50-75mm")),
    ("orange", CropProfile::new("13-37°C", "6-7", "100-200mm")),
    ("papaya", CropProfile::new("21-33°C", "6-6.5", "150-200mm")),
    ("muskmelon", CropProfile::new("18-30°C", "6-6.8", "50-75mm")),
    ("pomegranate", CropProfile::new("25-35°C", "5.5-7", "50-75mm")),
    ("lentil", CropProfile::new("18-30°C", "5.5-7", "80-100mm")),
    ("blackgram", CropProfile::new("25-35°C", "6.5-7.8", "60-75mm")),
    ("mungbean", CropProfile::new("27-30°C", "6.2-7.5", "60-70mm")),
    ("coffee", CropProfile::new("15-24°C", "6-6.5", "150-250mm")),
];

/// Immutable label → profile table
#[derive(Debug, Clone, Default)]
pub struct CropProfileRegistry {
    profiles: FxHashMap<String, CropProfile>,
}

impl CropProfileRegistry {
    /// The embedded 20-crop table
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_PROFILES
                .iter()
                .map(|(label, profile)| (*label, profile.clone())),
        )
    }

    /// Build from arbitrary entries; labels are lower-cased
    pub fn from_entries<K: AsRef<str>>(entries: impl IntoIterator<Item = (K, CropProfile)>) -> Self {
        let profiles = entries
            .into_iter()
            .map(|(label, profile)| (label.as_ref().to_lowercase(), profile))
            .collect();
        Self { profiles }
    }

    /// Merge a JSON object `{label: {temp, ph, rain}}` over this table
    pub fn with_overrides_from_path(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open crop profiles: {:?}", path))?;
        let extra: FxHashMap<String, CropProfile> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse crop profiles: {:?}", path))?;

        tracing::info!("Loaded {} crop profile overrides from {:?}", extra.len(), path);
        for (label, profile) in extra {
            self.profiles.insert(label.to_lowercase(), profile);
        }
        Ok(self)
    }

    /// Case-insensitive lookup; never fails
    pub fn lookup(&self, label: &str) -> &CropProfile {
        self.profiles
            .get(&label.to_lowercase())
            .unwrap_or(&UNAVAILABLE)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Known labels, sorted
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        labels.sort_unstable();
        labels
    }
}
