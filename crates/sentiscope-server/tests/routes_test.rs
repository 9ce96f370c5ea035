//! Integration tests for the HTTP routes
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use metrics_exporter_prometheus::PrometheusBuilder;
use sentiscope_classifiers::SentimentClassifier;
use sentiscope_server::{create_router, AppState, ServerConfig};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower::ServiceExt;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../sentiscope-classifiers/tests/fixtures/review_model.json")
}

fn app_with(classifier: SentimentClassifier, config: ServerConfig) -> Router {
    let handle = PrometheusBuilder::new().build_recorder().handle();
    create_router(AppState::new(config, classifier, handle))
}

fn app() -> Router {
    let classifier = SentimentClassifier::load(fixture_path());
    assert!(classifier.is_available());
    app_with(classifier, ServerConfig::default())
}

fn unavailable_app() -> Router {
    app_with(
        SentimentClassifier::unavailable("no artifact"),
        ServerConfig::default(),
    )
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = send(app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["model"], "review-sentiment-fixture");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_without_model() {
    let (status, body) = send(unavailable_app(), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_loaded"], false);
    assert_eq!(body["model"], Value::Null);
}

#[tokio::test]
async fn test_predict_positive() {
    let request = post_json(
        "/predict",
        json!({ "text": "Absolutely love this, best purchase ever" }),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sentiment"], "positive");
    assert_eq!(body["top_words"][0], "love");

    let probabilities = body["probabilities"].as_object().unwrap();
    assert_eq!(probabilities.len(), 3);
    let sum: f64 = probabilities.values().map(|p| p.as_f64().unwrap()).sum();
    assert!((sum - 1.0).abs() <= 0.001);
    assert_eq!(body["confidence"], body["probabilities"]["positive"]);
}

#[tokio::test]
async fn test_predict_short_text() {
    let (status, body) = send(app(), post_json("/predict", json!({ "text": "ok" }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "sentiment": "neutral",
            "confidence": 0.0,
            "probabilities": { "negative": 0.0, "neutral": 1.0, "positive": 0.0 },
            "top_words": [],
            "message": "Review too short"
        })
    );
}

#[tokio::test]
async fn test_predict_without_model() {
    let request = post_json("/predict", json!({ "text": "great product" }));
    let (status, body) = send(unavailable_app(), request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Model not loaded");
}

#[tokio::test]
async fn test_predict_rejects_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(Body::from("{\"text\": "))
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_predict_rejects_missing_field() {
    let response = app()
        .oneshot(post_json("/predict", json!({ "review": "great" })))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_batch_predict() {
    let request = post_json(
        "/predict/batch",
        json!({ "texts": ["Absolutely love this, best purchase ever", "", "It's okay. Does the job."] }),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["sentiment"], "positive");
    assert_eq!(items[0]["top_words"], json!([]));
    assert_eq!(items[1]["message"], "Review too short");
    assert_eq!(items[2]["sentiment"], "neutral");
}

#[tokio::test]
async fn test_batch_without_model_reports_each_item() {
    let request = post_json("/predict/batch", json!({ "texts": ["great", "awful"] }));
    let (status, body) = send(unavailable_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "error": "Model not loaded" }, { "error": "Model not loaded" }])
    );
}

#[tokio::test]
async fn test_batch_rejects_oversize_request() {
    let config = ServerConfig {
        max_batch_size: 2,
        ..Default::default()
    };
    let app = app_with(SentimentClassifier::load(fixture_path()), config);

    let request = post_json("/predict/batch", json!({ "texts": ["one", "two", "three"] }));
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("limit of 2"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let response = app().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route() {
    let (status, body) = send(app(), get("/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Not Found");
}
