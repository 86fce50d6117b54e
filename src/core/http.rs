//! HTTP endpoint server using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::analytics::error::{AnalyticsError, RangeError};
use crate::config::AnalyticsConfig;
use crate::engine::{AbortSignal, AnalyticsEngine, PreAggregated};
use crate::metrics::Metrics;
use crate::models::analytics::AnalyticsReport;
use crate::models::period::{AnalysisWindow, PeriodAggregate};
use crate::models::transaction::TransactionRecord;

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub engine: Arc<AnalyticsEngine>,
}

fn default_granularity() -> String {
    "daily".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowRequest {
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_granularity")]
    pub granularity: String,
}

impl WindowRequest {
    pub fn resolve(&self, engine: &AnalyticsEngine) -> Result<AnalysisWindow, RangeError> {
        engine.window(&self.start_date, &self.end_date, &self.granularity)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub window: WindowRequest,
    #[serde(default)]
    pub records: Vec<TransactionRecord>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregatesRequest {
    pub window: WindowRequest,
    pub periods: Vec<PeriodAggregate>,
    #[serde(default)]
    pub previous: Option<Vec<PeriodAggregate>>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Abort signal for a request-relative timeout, resolved at the boundary
pub fn abort_after(timeout_ms: Option<u64>) -> AbortSignal {
    match timeout_ms {
        Some(ms) => AbortSignal::none().with_deadline(Instant::now() + Duration::from_millis(ms)),
        None => AbortSignal::none(),
    }
}

#[derive(Debug)]
pub enum ApiError {
    Analytics(AnalyticsError),
    Internal(String),
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        ApiError::Analytics(err)
    }
}

impl From<RangeError> for ApiError {
    fn from(err: RangeError) -> Self {
        ApiError::Analytics(AnalyticsError::Range(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Analytics(AnalyticsError::Range(range)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": range.to_string(), "bound": range.bound() }),
            ),
            ApiError::Analytics(AnalyticsError::Input(input)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": input.to_string(), "subject": input.subject() }),
            ),
            ApiError::Analytics(err @ AnalyticsError::Aborted { stage }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": err.to_string(), "stage": stage }),
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "service": "txanalytics"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Run `job` on the blocking pool and account for it in the analysis metrics
async fn run_analysis<F>(state: &AppState, job: F) -> Result<Json<AnalyticsReport>, ApiError>
where
    F: FnOnce(&AnalyticsEngine) -> Result<AnalyticsReport, AnalyticsError> + Send + 'static,
{
    let engine = state.engine.clone();
    let started = Instant::now();

    let outcome = tokio::task::spawn_blocking(move || job(engine.as_ref()))
        .await
        .map_err(|e| {
            error!(error = %e, "analysis task failed");
            ApiError::Internal("analysis task failed".to_string())
        })?;

    state
        .metrics
        .analysis_duration_seconds
        .observe(started.elapsed().as_secs_f64());

    match outcome {
        Ok(report) => {
            state.metrics.analyses_total.inc();
            Ok(Json(report))
        }
        Err(err) => {
            state.metrics.analysis_rejections_total.inc();
            warn!(error = %err, "analysis request rejected");
            Err(err.into())
        }
    }
}

/// Analyze raw transaction records
async fn analyze_records(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let window = request.window.resolve(&state.engine).inspect_err(|err| {
        state.metrics.analysis_rejections_total.inc();
        warn!(error = %err, "rejected analysis window");
    })?;
    let abort = abort_after(request.timeout_ms);
    let records = request.records;

    run_analysis(&state, move |engine| engine.analyze(&records, &window, &abort)).await
}

/// Analyze buckets that were aggregated upstream
async fn analyze_aggregates(
    State(state): State<AppState>,
    Json(request): Json<AggregatesRequest>,
) -> Result<Json<AnalyticsReport>, ApiError> {
    let window = request.window.resolve(&state.engine).inspect_err(|err| {
        state.metrics.analysis_rejections_total.inc();
        warn!(error = %err, "rejected analysis window");
    })?;
    let abort = abort_after(request.timeout_ms);
    let periods = request.periods;
    let previous = request.previous;

    run_analysis(&state, move |engine| {
        engine.analyze_aggregates(
            PreAggregated {
                periods: &periods,
                previous: previous.as_deref(),
            },
            &window,
            &abort,
        )
    })
    .await
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/analytics", post(analyze_records))
        .route("/api/analytics/aggregates", post(analyze_aggregates))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub fn app_state(config: AnalyticsConfig) -> Result<AppState, prometheus::Error> {
    Ok(AppState {
        metrics: Arc::new(Metrics::new()?),
        start_time: Arc::new(Instant::now()),
        engine: Arc::new(AnalyticsEngine::new(config)),
    })
}

pub async fn start_server(port: u16, config: AnalyticsConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = app_state(config)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
