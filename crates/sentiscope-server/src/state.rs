//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use sentiscope_classifiers::SentimentClassifier;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ServerConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Classifier over the model loaded at startup
    pub classifier: Arc<SentimentClassifier>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        classifier: SentimentClassifier,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        Self {
            config: Arc::new(config),
            classifier: Arc::new(classifier),
            metrics_handle,
        }
    }

    /// Load the model named by the configuration.
    ///
    /// A missing or invalid artifact does not stop the server; predictions
    /// are refused until it is restarted with a usable model.
    pub fn load(config: ServerConfig, metrics_handle: PrometheusHandle) -> Self {
        info!("Loading model from {}", config.model_path);
        let classifier = SentimentClassifier::load(&config.model_path);

        if !classifier.is_available() {
            warn!("Serving without a model; /predict will return errors");
        }

        Self::new(config, classifier, metrics_handle)
    }
}
