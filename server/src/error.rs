use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request field.
    #[error("{0}")]
    Validation(String),

    /// The grammar-check upstream could not be reached or answered with an error.
    #[error("{0}")]
    UpstreamUnavailable(String),

    /// The AI classifier is not loaded.
    #[error("{0}")]
    ModelUnavailable(String),

    /// Anything else. `public` goes to the client, `cause` only to the log.
    #[error("{public}")]
    Internal { public: String, cause: String },
}

impl ApiError {
    pub fn internal(public: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        ApiError::Internal { public: public.into(), cause: cause.to_string() }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Validation(msg) => tracing::warn!(%status, "rejected request: {msg}"),
            ApiError::Internal { public, cause } => tracing::error!(%status, cause = %cause, "{public}"),
            other => tracing::error!(%status, "{other}"),
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_kind_to_its_status() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::UpstreamUnavailable("x".into()).status(), StatusCode::BAD_GATEWAY);
        assert_eq!(ApiError::ModelUnavailable("x".into()).status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::internal("x", "boom").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_cause_stays_out_of_message() {
        let err = ApiError::internal("An unexpected error occurred", "stack details");
        assert_eq!(err.to_string(), "An unexpected error occurred");
    }
}
