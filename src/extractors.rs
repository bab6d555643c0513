use axum::{
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::HttpError;
use crate::impl_into_response;

/// Query string extractor whose rejection is a `{message, code}` 400
///
/// Wraps axum's `Query` so malformed query strings (repeated keys, bad
/// encoding) go through the same logged JSON error path as validation errors.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = QueryParamsRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| QueryParamsRejection(rejection.body_text()))?;
        Ok(QueryParams(params))
    }
}

/// Rejection for query strings that cannot be deserialized
#[derive(Debug, Error)]
#[error("Invalid parameters: {0}")]
pub struct QueryParamsRejection(pub String);

impl HttpError for QueryParamsRejection {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_code(&self) -> Option<&'static str> {
        Some("invalid_parameters")
    }
}

impl_into_response!(QueryParamsRejection);
