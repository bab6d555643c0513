use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::AppState;

pub const REQUESTS_TOTAL: &str = "weather_requests_total";
pub const PROVIDER_ERRORS_TOTAL: &str = "provider_errors_total";

/// Install the global Prometheus recorder. Call once at startup.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    metrics::describe_counter!(
        REQUESTS_TOTAL,
        "Weather requests by endpoint, location branch and outcome"
    );
    metrics::describe_counter!(
        PROVIDER_ERRORS_TOTAL,
        "Failed calls to upstream providers"
    );
    Ok(handle)
}

pub fn record_request(endpoint: &'static str, branch: &'static str, outcome: &'static str) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "endpoint" => endpoint,
        "branch" => branch,
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_provider_error(provider: &'static str) {
    metrics::counter!(PROVIDER_ERRORS_TOTAL, "provider" => provider).increment(1);
}

/// Prometheus scrape endpoint
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
