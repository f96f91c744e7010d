//! HTTP error responses.
//!
//! Implements `IntoResponse` for `AuthError`. Not-found conditions become
//! 404, validation failures 400, token problems 401 with a
//! `WWW-Authenticate` challenge, and infrastructure failures 500.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        let code = self.error_code();

        // Internal details stay in the logs
        let message = if status.is_server_error() {
            tracing::error!(error = %self, category = %self.category(), "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "status": status.as_u16(),
            "error": code,
            "message": message,
        });

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            let www_auth = build_www_authenticate_header(code, &message);
            if let Ok(value) = HeaderValue::from_str(&www_auth) {
                headers.insert(header::WWW_AUTHENTICATE, value);
            }
        }

        (status, headers, Json(body)).into_response()
    }
}

/// Maps an error to its HTTP status.
#[must_use]
pub fn status_code(error: &AuthError) -> StatusCode {
    match error {
        AuthError::EntityNotFound { .. } => StatusCode::NOT_FOUND,
        AuthError::Validation { .. } => StatusCode::BAD_REQUEST,
        AuthError::InvalidToken { .. }
        | AuthError::Unauthorized { .. }
        | AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
        AuthError::Storage { .. } | AuthError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Builds the WWW-Authenticate header value for 401 responses.
///
/// Format: `Bearer realm="booklog", error="invalid_token", error_description="..."`
fn build_www_authenticate_header(error: &str, description: &str) -> String {
    let escaped_desc = description.replace('\"', "\\\"");
    format!(
        "Bearer realm=\"booklog\", error=\"{}\", error_description=\"{}\"",
        error, escaped_desc
    )
}
