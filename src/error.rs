//! Error types for the inference pipeline

use thiserror::Error;

/// Malformed or missing form input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing field {field}")]
    MissingField { field: &'static str },

    #[error("invalid numeric value for {field}")]
    InvalidNumber { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField { field } => field,
            ValidationError::InvalidNumber { field, .. } => field,
        }
    }
}

/// Classifier failed to produce a usable label
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("model error: {0}")]
    Model(String),

    #[error("model returned no prediction")]
    EmptyPrediction,

    #[error("model returned a blank label")]
    BlankLabel,

    #[error("model features {found:?} do not match expected {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Any failure the pipeline can report for a single request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PipelineError {
    /// Short machine-readable kind for API responses
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Inference(_) => "inference",
        }
    }
}

/// Failure loading a serialized model artifact
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model: {0}")]
    Invalid(String),
}
