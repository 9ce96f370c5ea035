//! HTTP routes and handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sentiscope_core::{Error, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = state.config.cors;

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/predict", post(predict))
        .route("/predict/batch", post(predict_batch))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub model: Option<String>,
    pub version: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchRequest {
    pub texts: Vec<String>,
}

/// One element of a batch response
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchItem {
    Verdict(Verdict),
    Error { error: String },
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.classifier.is_available(),
        model: state.classifier.model_name().map(str::to_string),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictRequest>,
) -> Result<Json<Verdict>, ApiError> {
    metrics::counter!("sentiscope_requests_total", "route" => "predict").increment(1);
    debug!("Received prediction request ({} chars)", req.text.len());

    let classifier = state.classifier.clone();
    let start = Instant::now();

    let verdict = tokio::task::spawn_blocking(move || classifier.classify(&req.text))
        .await
        .map_err(|e| ApiError::Internal(format!("classification task failed: {}", e)))??;

    metrics::histogram!("sentiscope_inference_latency_us")
        .record(start.elapsed().as_micros() as f64);
    metrics::counter!("sentiscope_predictions_total", "sentiment" => verdict.sentiment.clone())
        .increment(1);

    Ok(Json(verdict))
}

async fn predict_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<Vec<BatchItem>>, ApiError> {
    metrics::counter!("sentiscope_requests_total", "route" => "predict_batch").increment(1);

    let limit = state.config.max_batch_size;
    if req.texts.len() > limit {
        warn!("Rejected batch of {} texts (limit {})", req.texts.len(), limit);
        return Err(ApiError::BadRequest(format!(
            "batch of {} texts exceeds the limit of {}",
            req.texts.len(),
            limit
        )));
    }

    let classifier = state.classifier.clone();
    let start = Instant::now();

    let results = tokio::task::spawn_blocking(move || {
        let texts: Vec<&str> = req.texts.iter().map(String::as_str).collect();
        classifier.classify_batch(&texts)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("classification task failed: {}", e)))?;

    metrics::histogram!("sentiscope_inference_latency_us")
        .record(start.elapsed().as_micros() as f64);

    let items = results
        .into_iter()
        .map(|result| match result {
            Ok(verdict) => {
                metrics::counter!(
                    "sentiscope_predictions_total",
                    "sentiment" => verdict.sentiment.clone()
                )
                .increment(1);
                BatchItem::Verdict(verdict)
            }
            Err(e) => {
                metrics::counter!("sentiscope_errors_total", "kind" => e.kind()).increment(1);
                BatchItem::Error {
                    error: e.to_string(),
                }
            }
        })
        .collect();

    Ok(Json(items))
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

/// Error handling
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Classification(Error),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Classification(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg),
            ApiError::Classification(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.kind(), err.to_string())
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        if status.is_server_error() {
            error!("Request failed: {}", message);
        }
        metrics::counter!("sentiscope_errors_total", "kind" => kind).increment(1);

        (status, Json(json!({ "detail": message }))).into_response()
    }
}
