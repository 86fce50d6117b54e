//! Test utilities for API server integration tests

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use txanalytics::config::AnalyticsConfig;
use txanalytics::core::http::{app_state, create_router};
use txanalytics::metrics::Metrics;

/// Test helper for API server integration tests
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        Self::with_config(AnalyticsConfig::default()).await
    }

    pub async fn with_config(config: AnalyticsConfig) -> Self {
        let state = app_state(config).expect("metrics initialization");
        let metrics = state.metrics.clone();
        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self { server, metrics }
    }
}

/// One completed transaction per day of March 2024, growing by 100 each day
pub fn march_records(days: u32) -> Vec<Value> {
    (1..=days)
        .map(|d| {
            json!({
                "timestamp": format!("2024-03-{:02}T10:00:00Z", d),
                "amount": (100 * d).to_string(),
                "status": "completed",
                "fee": "1.00",
                "currency": "USD",
                "channel": "mobile"
            })
        })
        .collect()
}
