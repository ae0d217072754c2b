//! Error handling for the shelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

use crate::envelope::respond_with_error;

/// Message sent to clients for every internal failure.
pub const GENERIC_ERROR_MESSAGE: &str = "something went wrong";

/// Handler outcomes that map to an error envelope
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client-correctable input problem
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Expected absence of a resource
    #[error("not found: {0}")]
    NotFound(String),

    /// Anything the client cannot fix; detail stays in the log
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Wrap an underlying failure with a short description of what was attempted
    pub fn internal<E>(err: E, context: &'static str) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal(anyhow::Error::new(err).context(context))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        match self {
            ApiError::BadRequest(message) | ApiError::NotFound(message) => {
                tracing::debug!(
                    status_code = status.as_u16(),
                    reason = %message,
                    "request rejected"
                );
                respond_with_error(status, &message)
            }
            ApiError::Internal(err) => {
                let error_id = Uuid::now_v7();
                tracing::error!(
                    error_id = %error_id,
                    status_code = status.as_u16(),
                    error = %format!("{err:#}"),
                    "request failed"
                );
                respond_with_error(status, GENERIC_ERROR_MESSAGE)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::bad_request("invalid author id").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::not_found("author not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_client_errors_carry_their_message() {
        let response = ApiError::bad_request("invalid author id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "invalid author id"})
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let io = std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "10.0.0.7:5432 refused",
        );
        let response = ApiError::internal(io, "author lookup").into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body, serde_json::json!({"error": GENERIC_ERROR_MESSAGE}));
        assert!(!body.to_string().contains("10.0.0.7"));
    }
}
