// Page handlers for HTML rendering with Askama

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    Form,
};
use askama::Template;

use crate::api_server::AppState;
use crate::pipeline::InferenceResult;
use crate::schema::Feature;
use crate::validation::RawInput;

// ============================================================================
// Form Page
// ============================================================================

/// One input box, pre-filled on redisplay
pub struct FieldView {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
}

pub struct PredictionView {
    pub crop: String,
    pub temperature: String,
    pub ph: String,
    pub rainfall: String,
}

#[derive(Template)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub fields: Vec<FieldView>,
    pub prediction: Option<PredictionView>,
    pub error: Option<String>,
}

impl IndexTemplate {
    fn new(values: impl Fn(Feature) -> String) -> Self {
        Self {
            title: "Crop Recommendation".to_string(),
            fields: Feature::ALL
                .into_iter()
                .map(|f| FieldView {
                    name: f.name(),
                    label: f.label(),
                    value: values(f),
                })
                .collect(),
            prediction: None,
            error: None,
        }
    }

    pub fn blank() -> Self {
        Self::new(|_| String::new())
    }

    pub fn from_result(result: &InferenceResult) -> Self {
        match result {
            InferenceResult::Success(rec) => {
                let mut page = Self::new(|f| rec.features.get(f).to_string());
                page.prediction = Some(PredictionView {
                    crop: rec.label.clone(),
                    temperature: rec.profile.temperature.to_string(),
                    ph: rec.profile.ph.to_string(),
                    rainfall: rec.profile.rainfall.to_string(),
                });
                page
            }
            InferenceResult::Failure(failure) => {
                let mut page = Self::new(|f| {
                    failure.submitted.get(f.name()).unwrap_or_default().to_string()
                });
                page.error = Some(result.message());
                page
            }
        }
    }
}

pub async fn index_page() -> impl IntoResponse {
    render(IndexTemplate::blank())
}

pub async fn predict_page(
    State(state): State<AppState>,
    Form(raw): Form<RawInput>,
) -> impl IntoResponse {
    let result = state.pipeline.run(&raw);
    render(IndexTemplate::from_result(&result))
}

fn render(template: IndexTemplate) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
}
