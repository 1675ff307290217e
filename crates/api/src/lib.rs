//! Churn Prediction API Server
//!
//! REST endpoint and interactive form demo for scoring customers against the
//! churn model loaded at startup.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use data_validator::Validator;
use feature_engine::CustomerRecord;
use inference_engine::{InferenceEngine, InferenceResult};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
mod routes;

pub use config::{AppConfig, LoggingConfig, ServerConfig};
pub use error::ApiError;

/// Application state shared read-only across handlers
pub struct AppState {
    /// Loaded schema, scaler and model
    pub engine: InferenceEngine,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Successful predictions served
    prediction_count: AtomicU64,
    /// Prometheus handle, when the recorder is installed
    metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state around a loaded engine
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            engine,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            prediction_count: AtomicU64::new(0),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Number of successful predictions
    pub fn prediction_count(&self) -> u64 {
        self.prediction_count.load(Ordering::Relaxed)
    }

    /// Score a record and record metrics for the outcome
    pub fn score(&self, record: &CustomerRecord) -> Result<InferenceResult, ApiError> {
        match self.engine.predict(record) {
            Ok(result) => {
                self.prediction_count.fetch_add(1, Ordering::Relaxed);
                metrics::counter!("churn_predictions_total", "label" => result.label.as_str())
                    .increment(1);
                metrics::histogram!("churn_prediction_latency_ms").record(result.latency_ms as f64);
                Ok(result)
            }
            Err(err) => {
                let err = ApiError::from(err);
                metrics::counter!("churn_prediction_errors_total", "kind" => err.kind())
                    .increment(1);
                Err(err)
            }
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub feature_columns: usize,
    pub prediction_count: u64,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/predict", post(routes::predict::predict))
        .route("/api/v1/predict", post(routes::predict::predict))
        .route(
            "/demo",
            get(routes::demo::form_page).post(routes::demo::submit_form),
        )
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        feature_columns: state.engine.schema().len(),
        prediction_count: state.prediction_count(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled\n".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let builder = FmtSubscriber::builder()
        .with_max_level(config.max_level())
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
}

/// Load artifacts and run the server until it stops
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Refuse to serve predictions without the artifacts
    let engine = InferenceEngine::load(&config.artifacts)?
        .with_validator(Validator::new(config.validation.clone()));

    let mut state = AppState::new(engine);
    if config.server.enable_metrics {
        state = state.with_metrics(PrometheusBuilder::new().install_recorder()?);
    }
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", config.server.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use inference_engine::ArtifactPaths;

    fn engine() -> InferenceEngine {
        let paths = ArtifactPaths::in_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/../../artifacts"));
        InferenceEngine::load(&paths).unwrap()
    }

    fn customer() -> CustomerRecord {
        CustomerRecord {
            gender: Some("Female".into()),
            senior_citizen: Some(0),
            partner: Some("Yes".into()),
            dependents: Some("No".into()),
            tenure: Some(12.0),
            phone_service: Some("Yes".into()),
            multiple_lines: Some("No".into()),
            internet_service: Some("Fiber optic".into()),
            online_security: Some("No".into()),
            online_backup: Some("Yes".into()),
            device_protection: Some("No".into()),
            tech_support: Some("No".into()),
            streaming_tv: Some("Yes".into()),
            streaming_movies: Some("No".into()),
            contract: Some("Month-to-month".into()),
            paperless_billing: Some("Yes".into()),
            payment_method: Some("Electronic check".into()),
            monthly_charges: Some(70.0),
            total_charges: Some(2500.0),
        }
    }

    #[test]
    fn test_score_records_metrics() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let state = AppState::new(engine()).with_metrics(recorder.handle());

        metrics::with_local_recorder(&recorder, || {
            assert!(state.score(&customer()).is_ok());
            let missing = CustomerRecord {
                tenure: None,
                ..customer()
            };
            assert!(state.score(&missing).is_err());
        });

        let rendered = state.metrics.as_ref().unwrap().render();
        assert!(rendered.contains("churn_predictions_total{label=\"churn\"} 1"));
        assert!(rendered.contains("churn_prediction_errors_total{kind=\"validation_error\"} 1"));
        assert!(rendered.contains("churn_prediction_latency_ms"));
        assert_eq!(state.prediction_count(), 1);
    }
}
