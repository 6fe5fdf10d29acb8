use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use tariffs_core::models::ValidationError;
use tariffs_core::storage::{repository_error_to_status_code, RepositoryError};

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: u16,
    pub name: &'static str,
    pub detail: String,
}

/// Error returned by every API handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: detail.into(),
        }
    }

    pub fn gateway_timeout() -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            detail: "Gateway Timeout".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    fn name(&self) -> &'static str {
        match self.status {
            StatusCode::BAD_REQUEST => "BadRequest",
            StatusCode::NOT_FOUND => "ResourceNotFound",
            StatusCode::SERVICE_UNAVAILABLE => "ServiceUnavailable",
            StatusCode::GATEWAY_TIMEOUT => "GatewayTimeout",
            _ => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            code: status.as_u16(),
            name: self.name(),
            detail: self.detail,
        };

        (status, Json(body)).into_response()
    }
}

/// Gives the bare 504 produced by the timeout layer the JSON error body.
///
/// Responses that already carry a body type pass through untouched.
pub async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::GATEWAY_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        tracing::warn!("Request timed out");
        return ApiError::gateway_timeout().into_response();
    }
    response
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let status = StatusCode::from_u16(repository_error_to_status_code(&err))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Store failures are logged here and never echoed to the client
        let detail = match status {
            StatusCode::NOT_FOUND => "Resource not found",
            StatusCode::SERVICE_UNAVAILABLE => {
                tracing::warn!(error = %err, "Store unavailable");
                "Service Unavailable"
            }
            StatusCode::GATEWAY_TIMEOUT => {
                tracing::warn!(error = %err, "Store deadline exceeded");
                "Gateway Timeout"
            }
            _ => {
                tracing::error!(error = %err, "Repository operation failed");
                "Internal Server Error"
            }
        };

        Self {
            status,
            detail: detail.to_string(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
