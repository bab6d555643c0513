use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorResponse;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Wrapper type for the configured API key
#[derive(Clone)]
pub struct ApiKey(pub Option<String>);

/// Middleware that requires a valid API key for weather endpoints
///
/// If `api_key` is not configured (None), all requests are allowed (development mode).
/// If configured, the `X-API-Key` header must match the configured key.
pub async fn require_api_key(
    Extension(ApiKey(expected_key)): Extension<ApiKey>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // If no API key is configured, allow all requests
    let Some(expected) = expected_key else {
        return next.run(request).await;
    };

    let provided_key = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match provided_key {
        Some(key) if key == expected => next.run(request).await,
        Some(_) => {
            tracing::warn!("Invalid API key provided");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::with_code("Invalid API key.", "invalid_api_key")),
            )
                .into_response()
        }
        None => {
            tracing::warn!("Missing API key");
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::with_code(
                    "API key required. Provide X-API-Key header.",
                    "missing_api_key",
                )),
            )
                .into_response()
        }
    }
}
