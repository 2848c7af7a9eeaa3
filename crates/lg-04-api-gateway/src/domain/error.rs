//! Mapping from the dispatcher's error taxonomy to HTTP.
//!
//! Every failure leaves the gateway as
//! `{"success": false, "error": {"kind", "message", "retryAfterSecs"?}}`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use lg_03_dispatcher::{supported_actions, DispatchError};
use serde::Serialize;
use thiserror::Error;

/// HTTP status for a dispatch failure.
pub fn status_for(err: &DispatchError) -> StatusCode {
    match err {
        DispatchError::Unauthorized => StatusCode::UNAUTHORIZED,
        DispatchError::ServerMisconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DispatchError::MissingPayload(_)
        | DispatchError::InvalidAction(_)
        | DispatchError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
        DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
        DispatchError::VersionConflict { .. } => StatusCode::CONFLICT,
        DispatchError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        DispatchError::StoreUnavailable(_) => StatusCode::BAD_GATEWAY,
        DispatchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_actions: Option<Vec<&'static str>>,
}

/// A failed request, ready to be rendered.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: String,
    pub message: String,
    pub retry_after_secs: Option<u64>,
    pub supported_actions: Option<Vec<&'static str>>,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.into(),
            message: message.into(),
            retry_after_secs: None,
            supported_actions: None,
        }
    }

    /// Body that is not JSON or lacks an `action`.
    pub fn malformed_body(details: impl Into<String>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "InvalidPayload",
            format!("Malformed request body: {}", details.into()),
        )
    }

    /// The body could not be read, e.g. it exceeded the size limit.
    pub fn unreadable_body(status: StatusCode, details: impl Into<String>) -> Self {
        Self::new(
            status,
            "InvalidPayload",
            format!("Unreadable request body: {}", details.into()),
        )
    }

    /// The whole request ran past the gateway deadline.
    pub fn timed_out(limit_secs: u64) -> Self {
        Self::new(
            StatusCode::GATEWAY_TIMEOUT,
            "StoreUnavailable",
            format!("Request exceeded {limit_secs}s timeout"),
        )
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: ErrorDetail {
                kind: self.kind.clone(),
                message: self.message.clone(),
                retry_after_secs: self.retry_after_secs,
            },
            supported_actions: self.supported_actions.clone(),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        let supported_actions =
            matches!(err, DispatchError::InvalidAction(_)).then(supported_actions);
        Self {
            status: status_for(&err),
            kind: err.kind().to_string(),
            message: err.to_string(),
            retry_after_secs: err.retry_after_secs(),
            supported_actions,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let retry_after = self.retry_after_secs;
        let mut response = (self.status, Json(self.body())).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
