mod config;
mod error;
mod extractors;
mod location;
mod middleware;
mod openapi;
mod providers;
mod routes;
mod telemetry;
#[cfg(test)]
mod testing;
mod validators;
mod weather;

use axum::{
    error_handling::HandleErrorLayer,
    http::{header::HeaderName, Method, StatusCode},
    BoxError, Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::error::ErrorResponse;
use crate::providers::{IpApiClient, OpenWeatherMapClient};
use crate::weather::{Providers, WeatherService};

/// Shared HTTP client configuration
const HTTP_TIMEOUT_SECS: u64 = 30;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub config: Arc<AppConfig>,
    pub metrics: Option<PrometheusHandle>,
}

/// Create shared HTTP client with connection pooling
fn create_http_client() -> reqwest::Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Wire the OpenWeatherMap and ip-api adapters onto the provider seams
fn create_providers(client: Client, config: &AppConfig) -> Providers {
    let openweathermap = Arc::new(OpenWeatherMapClient::new(
        client.clone(),
        &config.openweathermap_api_key,
        &config.openweathermap_url,
    ));
    let ip_locator = Arc::new(IpApiClient::new(client, &config.ip_geolocation_url));

    Providers {
        forward_geocoder: openweathermap.clone(),
        reverse_geocoder: openweathermap.clone(),
        ip_locator,
        current_weather: openweathermap.clone(),
        daily_weather: openweathermap,
    }
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(ErrorResponse::with_code(
                "Request timed out.",
                "request_timeout",
            )),
        )
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal()))
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geoweather=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!(
        units = %config.units,
        language = %config.language,
        max_forecast_days = config.max_forecast_days,
        api_key_required = config.api_key.is_some(),
        "Configuration loaded successfully"
    );

    let metrics = match telemetry::install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::warn!(error = %e, "Prometheus recorder not installed, /metrics disabled");
            None
        }
    };

    // Create shared HTTP client with connection pooling
    let http_client = create_http_client()?;
    tracing::debug!("Shared HTTP client created");

    let weather_service = Arc::new(WeatherService::new(create_providers(
        http_client,
        &config,
    )));

    // Create shared application state
    let state = AppState {
        weather_service,
        config: Arc::new(config.clone()),
        metrics,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([HeaderName::from_static("x-api-key")]);

    // Build router
    let app = routes::build_router(state.clone())
        .layer(
            ServiceBuilder::new()
                // Handle timeout errors
                .layer(HandleErrorLayer::new(handle_timeout_error))
                // Request timeout covers every upstream call of a request
                .timeout(Duration::from_secs(config.request_timeout_secs)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
