//! The single path every handler response is written through.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Body of every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Serialize `payload` as the response body with `status`.
///
/// The body is fully serialized before anything is written; if that fails the
/// client gets a bare 500 and the cause goes to the log.
pub fn respond_with_json<T: Serialize>(status: StatusCode, payload: &T) -> Response {
    let json_content = [(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    )];

    match serde_json::to_vec(payload) {
        Ok(body) => (status, json_content, body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to serialize response body");
            (StatusCode::INTERNAL_SERVER_ERROR, json_content).into_response()
        }
    }
}

/// Render `{"error": message}` with `status`; server errors are logged.
pub fn respond_with_error(status: StatusCode, message: &str) -> Response {
    if status.is_server_error() {
        tracing::warn!(
            status_code = status.as_u16(),
            reason = message,
            "responding with server error"
        );
    }
    respond_with_json(
        status,
        &ErrorResponse {
            error: message.to_string(),
        },
    )
}
