//! Inference Pipeline
//!
//! Received → Validated → VectorBuilt → Classified → ProfileResolved → Returned.
//!
//! Only validation and classification can fail; profile resolution always
//! succeeds. No stage retries: every stage is a pure function of its input.

use crate::classifier::{Classifier, CropLabel};
use crate::error::PipelineError;
use crate::features::build_feature_vector;
use crate::profiles::{CropProfile, CropProfileRegistry};
use crate::validation::{validate, FeatureValues, RawInput};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Successful prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub label: CropLabel,
    pub profile: CropProfile,
    /// Validated values, for redisplay
    pub features: FeatureValues,
}

/// Failed prediction, carrying the raw submission for correction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionFailure {
    #[serde(serialize_with = "serialize_display")]
    pub error: PipelineError,
    pub submitted: RawInput,
}

/// Outcome of one request; never partially populated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InferenceResult {
    Success(Recommendation),
    Failure(PredictionFailure),
}

impl InferenceResult {
    pub fn is_success(&self) -> bool {
        matches!(self, InferenceResult::Success(_))
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        match self {
            InferenceResult::Success(rec) => Some(rec),
            InferenceResult::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&PipelineError> {
        match self {
            InferenceResult::Success(_) => None,
            InferenceResult::Failure(failure) => Some(&failure.error),
        }
    }

    /// Text shown to the user: the crop name, or the error
    pub fn message(&self) -> String {
        match self {
            InferenceResult::Success(rec) => rec.label.clone(),
            InferenceResult::Failure(failure) => format!("Prediction error: {}", failure.error),
        }
    }
}

fn serialize_display<S: Serializer>(error: &PipelineError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// Stateless orchestrator over shared, read-only collaborators
#[derive(Clone)]
pub struct InferencePipeline {
    classifier: Arc<dyn Classifier>,
    registry: Arc<CropProfileRegistry>,
}

impl InferencePipeline {
    pub fn new(classifier: Arc<dyn Classifier>, registry: Arc<CropProfileRegistry>) -> Self {
        Self { classifier, registry }
    }

    pub fn registry(&self) -> &CropProfileRegistry {
        &self.registry
    }

    /// Typed entry point
    pub fn predict(&self, raw: &RawInput) -> Result<Recommendation, PipelineError> {
        let features = validate(raw)?;
        let vector = build_feature_vector(&features);
        tracing::debug!("Feature vector: {:?}", vector.as_slice());

        let label = self.classifier.classify(&vector)?;
        let profile = self.registry.lookup(&label).clone();
        if !profile.is_available() {
            tracing::debug!("No crop profile for label '{}'", label);
        }

        Ok(Recommendation { label, profile, features })
    }

    /// Boundary entry point; failures are folded into the result
    pub fn run(&self, raw: &RawInput) -> InferenceResult {
        match self.predict(raw) {
            Ok(rec) => {
                tracing::debug!("Predicted '{}'", rec.label);
                InferenceResult::Success(rec)
            }
            Err(error) => {
                tracing::warn!(kind = error.kind(), "Prediction failed: {}", error);
                InferenceResult::Failure(PredictionFailure {
                    error,
                    submitted: raw.clone(),
                })
            }
        }
    }

    /// Independent requests in parallel, results in input order
    pub fn run_batch(&self, inputs: &[RawInput]) -> Vec<InferenceResult> {
        inputs.par_iter().map(|raw| self.run(raw)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InferenceError, ValidationError};
    use crate::features::FeatureVector;
    use crate::schema::FEATURE_NAMES;

    struct EchoPh;

    impl Classifier for EchoPh {
        fn classify(&self, vector: &FeatureVector) -> Result<CropLabel, InferenceError> {
            if vector.as_slice()[5] < 6.0 {
                Ok("Rice".to_string())
            } else {
                Err(InferenceError::EmptyPrediction)
            }
        }
    }

    fn pipeline() -> InferencePipeline {
        InferencePipeline::new(Arc::new(EchoPh), Arc::new(CropProfileRegistry::builtin()))
    }

    fn raw(ph: &str) -> RawInput {
        let mut raw: RawInput = FEATURE_NAMES.iter().map(|n| (*n, "1")).collect();
        raw.insert("ph", ph);
        raw
    }

    #[test]
    fn test_success_carries_profile_and_values() {
        let result = pipeline().run(&raw("5.5"));
        let rec = result.recommendation().unwrap();
        assert_eq!(rec.label, "Rice");
        assert_eq!(rec.profile.temperature, "22-30°C");
        assert_eq!(rec.features.ph, 5.5);
        assert_eq!(result.message(), "Rice");
    }

    #[test]
    fn test_failures_keep_raw_input() {
        let result = pipeline().run(&raw("acid"));
        assert!(!result.is_success());
        assert!(result.recommendation().is_none());
        match &result {
            InferenceResult::Failure(failure) => {
                assert_eq!(failure.submitted.get("ph"), Some("acid"));
                assert_eq!(
                    failure.error,
                    PipelineError::Validation(ValidationError::InvalidNumber {
                        field: "ph",
                        value: "acid".to_string(),
                    })
                );
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(result.message(), "Prediction error: invalid numeric value for ph");

        let result = pipeline().run(&raw("7"));
        assert_eq!(result.error().map(|e| e.kind()), Some("inference"));
    }

    #[test]
    fn test_result_json_shape() {
        let ok = serde_json::to_value(pipeline().run(&raw("5"))).unwrap();
        assert_eq!(ok["status"], "success");
        assert_eq!(ok["label"], "Rice");
        assert_eq!(ok["profile"]["rain"], "150-300mm");
        assert_eq!(ok["features"]["ph"], 5.0);

        let err = serde_json::to_value(pipeline().run(&raw(""))).unwrap();
        assert_eq!(err["status"], "failure");
        assert_eq!(err["error"], "invalid numeric value for ph");
        assert_eq!(err["submitted"]["ph"], "");
    }

    #[test]
    fn test_batch_preserves_order() {
        let inputs = vec![raw("5"), raw("x"), raw("7"), raw("4")];
        let results = pipeline().run_batch(&inputs);
        let status: Vec<bool> = results.iter().map(|r| r.is_success()).collect();
        assert_eq!(status, vec![true, false, false, true]);
        assert_eq!(results[1].error().map(|e| e.kind()), Some("validation"));
    }
}
