use axum::{middleware, routing::get, Extension, Router};

use crate::middleware::{require_api_key, ApiKey};
use crate::openapi::swagger_ui;
use crate::telemetry;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the weather API routes (protected by API key auth when one is configured)
fn weather_routes(api_key: Option<String>) -> Router<AppState> {
    Router::new()
        .route(
            "/weather/current",
            get(weather_handlers::get_current_weather),
        )
        .route("/weather/daily", get(weather_handlers::get_daily_weather))
        // Layers run bottom-up: the key must be in the extensions before the check
        .layer(middleware::from_fn(require_api_key))
        .layer(Extension(ApiKey(api_key)))
}

/// Build all API v1 routes
pub fn api_v1_routes(api_key: Option<String>) -> Router<AppState> {
    Router::new().merge(weather_routes(api_key))
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router<AppState> {
    let api_key = state.config.api_key.clone();
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .route("/metrics", get(telemetry::metrics_handler))
        // API v1 routes
        .nest("/api/v1", api_v1_routes(api_key))
        // Swagger UI for API documentation
        .merge(swagger_ui())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::build_router;
    use crate::testing::{test_config, test_state, FakeProviders};

    async fn status_of(uri: &str) -> StatusCode {
        let fake = Arc::new(FakeProviders::paris());
        let state = test_state(&fake, test_config());
        build_router(state.clone())
            .with_state(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_routes() {
        assert_eq!(status_of("/").await, StatusCode::OK);
        assert_eq!(status_of("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_metrics_without_recorder() {
        assert_eq!(status_of("/metrics").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        assert_eq!(status_of("/api-docs/openapi.json").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        assert_eq!(status_of("/api/v1/weather/hourly").await, StatusCode::NOT_FOUND);
    }
}
