// API Integration Tests
//
// Purpose: Drive the router end to end with the bundled demo forest
// Run with: cargo test --features api --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use crop_advisor::{create_router, AppConfig, AppState};
    use serde_json::Value;
    use std::path::PathBuf;
    use tower::ServiceExt; // for oneshot

    const SCENARIO_A_FORM: &str =
        "N=90&P=42&K=43&temperature=20.8&humidity=82&ph=6.5&rainfall=202.9";

    // Helper: Create test app backed by models/crop_forest.json
    fn create_test_app() -> axum::Router {
        let config = AppConfig {
            model_path: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models/crop_forest.json"),
            ..AppConfig::default()
        };
        let state = AppState::new(&config).expect("demo model should load");
        create_router(state)
    }

    async fn body_string(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        String::from_utf8(body.to_vec()).expect("body is utf-8")
    }

    async fn json_response(response: axum::response::Response) -> Value {
        serde_json::from_str(&body_string(response).await).expect("Failed to parse JSON")
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    // =========================================================================
    // Section 1: Health and form page
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_index_renders_empty_form() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        for name in crop_advisor::FEATURE_NAMES {
            assert!(html.contains(&format!("name=\"{}\"", name)), "missing input {}", name);
        }
        assert!(!html.contains("Recommended crop"));
    }

    // =========================================================================
    // Section 2: Form submission
    // =========================================================================

    #[tokio::test]
    async fn test_form_predicts_rice() {
        let response = create_test_app()
            .oneshot(post_form("/predict", SCENARIO_A_FORM))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Recommended crop: rice"));
        assert!(html.contains("22-30°C"));
        assert!(html.contains("150-300mm"));
        assert!(html.contains("value=\"202.9\""));
    }

    #[tokio::test]
    async fn test_form_error_redisplays_input() {
        let body = SCENARIO_A_FORM.replace("rainfall=202.9", "rainfall=abc");
        let response = create_test_app()
            .oneshot(post_form("/predict", &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Prediction error: invalid numeric value for rainfall"));
        assert!(html.contains("value=\"abc\""));
        assert!(html.contains("value=\"90\""));
        assert!(!html.contains("Recommended crop"));
    }

    // =========================================================================
    // Section 3: JSON API
    // =========================================================================

    #[tokio::test]
    async fn test_json_predict() {
        let request = post_json(
            "/api/predict",
            serde_json::json!({
                "N": "90", "P": "42", "K": "43", "temperature": "20.8",
                "humidity": "82", "ph": "6.5", "rainfall": "202.9"
            }),
        );
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["label"], "rice");
        assert_eq!(body["profile"]["temp"], "22-30°C");
        assert_eq!(body["profile"]["ph"], "5-6.5");
        assert_eq!(body["features"]["N"], 90.0);
    }

    #[tokio::test]
    async fn test_json_missing_field_is_bad_request() {
        let request = post_json(
            "/api/predict",
            serde_json::json!({ "N": "90", "P": "42", "K": "43" }),
        );
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_response(response).await;
        assert_eq!(body["kind"], "validation");
        assert_eq!(body["error"], "missing field temperature");
    }

    #[tokio::test]
    async fn test_json_accepts_numeric_values() {
        let request = post_json(
            "/api/predict",
            serde_json::json!({
                "N": 90, "P": 42, "K": 43, "temperature": 20.8,
                "humidity": 82, "ph": 6.5, "rainfall": 202.9
            }),
        );
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["label"], "rice");
        assert_eq!(body["features"]["rainfall"], 202.9);
    }

    #[tokio::test]
    async fn test_json_null_and_bool_values_fail_validation() {
        let request = post_json(
            "/api/predict",
            serde_json::json!({
                "N": 90, "P": 42, "K": null, "temperature": 20.8,
                "humidity": 82, "ph": 6.5, "rainfall": 202.9
            }),
        );
        let response = create_test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_response(response).await;
        assert_eq!(body["error"], "missing field K");

        let request = post_json(
            "/api/predict",
            serde_json::json!({
                "N": 90, "P": 42, "K": 43, "temperature": 20.8,
                "humidity": true, "ph": 6.5, "rainfall": 202.9
            }),
        );
        let response = create_test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_response(response).await;
        assert_eq!(body["error"], "invalid numeric value for humidity");
    }

    #[tokio::test]
    async fn test_json_malformed_body_is_bad_request() {
        for payload in ["{\"N\": 90,", "[1, 2, 3]"] {
            let request = Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload))
                .unwrap();
            let response = create_test_app().oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "payload {}", payload);
            assert!(response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/json"));
            let body = json_response(response).await;
            assert_eq!(body["kind"], "validation");
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_json_unknown_crop_has_na_profile() {
        let request = post_json(
            "/api/predict",
            serde_json::json!({
                "N": "40", "P": "60", "K": "80", "temperature": "18",
                "humidity": "30", "ph": "7", "rainfall": "80"
            }),
        );
        let response = create_test_app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["label"], "chickpea");
        assert_eq!(body["profile"]["temp"], "N/A");
        assert_eq!(body["profile"]["rain"], "N/A");
    }

    #[tokio::test]
    async fn test_list_crops() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/api/crops").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_response(response).await;
        assert_eq!(body["rows"], 20);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data[0]["label"], "apple");
        assert!(data.iter().any(|c| c["label"] == "rice" && c["rain"] == "150-300mm"));
    }
}
