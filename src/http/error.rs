/// Error-to-status mapping at the HTTP boundary
///
/// Taxonomy: InvalidInput -> 400, NotFound -> 404, Unavailable -> 503,
/// anything unexpected -> 500 with the error detail in the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::service::ServiceError;

/// JSON error body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Wrapper that turns a service error into an HTTP response
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Storage(_) | ServiceError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        }

        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
