// Axum web boundary
//
// Purpose: serve the crop recommendation form and a JSON prediction endpoint
// on top of the stateless inference pipeline.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use anyhow::Context;
use std::sync::Arc;

use crate::classifier::{Classifier, ModelAdapter, TreeEnsemble};
use crate::config::AppConfig;
use crate::error::PipelineError;
use crate::pipeline::{InferencePipeline, Recommendation};
use crate::profiles::CropProfileRegistry;
use crate::validation::RawInput;
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub pipeline: InferencePipeline,
}

impl AppState {
    /// Load the model artifact and crop table once at startup
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading classifier from {:?}...", config.model_path);
        let model = TreeEnsemble::from_path(&config.model_path)
            .with_context(|| format!("Failed to load model: {:?}", config.model_path))?;
        let classifier = ModelAdapter::new(model)?;

        tracing::info!("Building crop profile registry...");
        let mut registry = CropProfileRegistry::builtin();
        if let Some(path) = &config.profiles_path {
            registry = registry.with_overrides_from_path(path)?;
        }
        tracing::info!("Registry holds {} crop profiles", registry.len());

        Ok(Self::from_parts(Arc::new(classifier), Arc::new(registry)))
    }

    pub fn from_parts(classifier: Arc<dyn Classifier>, registry: Arc<CropProfileRegistry>) -> Self {
        Self {
            pipeline: InferencePipeline::new(classifier, registry),
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML form
        .route("/", get(pages::index_page))
        .route("/predict", post(pages::predict_page))

        // JSON API
        .route("/api/predict", post(predict_json))
        .route("/api/crops", get(list_crops))

        // Health check
        .route("/health", get(health_check))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// POST /api/predict with a JSON object of field → value
///
/// Values may be strings or JSON numbers; `null` counts as missing.
async fn predict_json(
    State(state): State<AppState>,
    payload: Result<Json<serde_json::Map<String, serde_json::Value>>, JsonRejection>,
) -> Result<Json<Recommendation>, AppError> {
    let Json(body) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let raw = raw_input_from_json(body);
    let recommendation = state.pipeline.predict(&raw)?;
    Ok(Json(recommendation))
}

/// Flatten JSON scalars to the text the form would have submitted
fn raw_input_from_json(body: serde_json::Map<String, serde_json::Value>) -> RawInput {
    body.into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect()
}

/// GET /api/crops: the full profile table
async fn list_crops(State(state): State<AppState>) -> Json<serde_json::Value> {
    let registry = state.pipeline.registry();
    let data: Vec<serde_json::Value> = registry
        .labels()
        .into_iter()
        .map(|label| {
            let profile = registry.lookup(label);
            serde_json::json!({
                "label": label,
                "temp": profile.temperature,
                "ph": profile.ph,
                "rain": profile.rainfall,
            })
        })
        .collect();

    Json(serde_json::json!({
        "rows": data.len(),
        "data": data,
    }))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    Validation(String),
    Inference(String),
}

impl From<PipelineError> for AppError {
    fn from(error: PipelineError) -> Self {
        match error {
            PipelineError::Validation(e) => AppError::Validation(e.to_string()),
            PipelineError::Inference(e) => {
                tracing::error!(detail = %e, "Classifier failed");
                AppError::Inference(e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation", msg),
            AppError::Inference(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "inference", msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
