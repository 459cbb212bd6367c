//! HTTP error mapping
//!
//! Every error response has the body `{"detail": "..."}`, including
//! request bodies rejected before a handler runs (see [`ApiJson`]).

use crate::domain::{HeartwatchError, StoreError};
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Handler error carrying the status it should be reported with
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl From<HeartwatchError> for ApiError {
    fn from(err: HeartwatchError) -> Self {
        let status = match &err {
            HeartwatchError::NotFound(_) => StatusCode::NOT_FOUND,
            HeartwatchError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            HeartwatchError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }
        Self::new(status, err.to_string())
    }
}

/// Keeps axum's status (400 syntax, 415 content type, 422 data) and
/// moves its message into `detail`
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

/// JSON request body whose rejections are reported as [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (HeartwatchError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                StoreError::Conflict("dup".into()).into(),
                StatusCode::CONFLICT,
            ),
            (
                HeartwatchError::Validation("age".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                StoreError::QueryFailed("boom".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }

    #[test]
    fn test_not_found_detail_is_bare_message() {
        let err = ApiError::from(HeartwatchError::NotFound(
            "No heart attack tests found".into(),
        ));
        assert_eq!(err.detail(), "No heart attack tests found");
    }
}
