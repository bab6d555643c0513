use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Message returned for every 5xx so upstream detail never reaches clients
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Standard error response format for all API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    pub fn internal() -> Self {
        Self::new(INTERNAL_ERROR_MESSAGE)
    }
}

/// Trait for errors that can be converted to HTTP responses
pub trait HttpError: std::error::Error {
    /// HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Optional error code for programmatic handling (e.g., "invalid_ip")
    fn error_code(&self) -> Option<&'static str> {
        None
    }

    /// Message shown to the client. Server errors hide their detail.
    fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Convert any HttpError into an Axum response
pub fn into_response<E: HttpError>(err: E) -> Response {
    let status = err.status_code();
    let code = err.error_code();

    tracing::error!(
        error = %err,
        status = %status,
        code = ?code,
        "API error"
    );

    let message = err.public_message();
    let body = if let Some(code) = code {
        ErrorResponse::with_code(message, code)
    } else {
        ErrorResponse::new(message)
    };

    (status, Json(body)).into_response()
}

/// Macro to implement IntoResponse for HttpError types
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::into_response(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    enum SampleError {
        #[error("bad input")]
        BadInput,
        #[error("upstream exploded with secret token abc123")]
        Upstream,
    }

    impl HttpError for SampleError {
        fn status_code(&self) -> StatusCode {
            match self {
                Self::BadInput => StatusCode::BAD_REQUEST,
                Self::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    #[test]
    fn test_client_errors_expose_message() {
        assert_eq!(SampleError::BadInput.public_message(), "bad input");
    }

    #[test]
    fn test_server_errors_hide_detail() {
        assert_eq!(
            SampleError::Upstream.public_message(),
            INTERNAL_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_error_response_skips_missing_code() {
        let json = serde_json::to_value(ErrorResponse::internal()).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "Internal server error." }));
    }
}
