use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::MessageBody;
use service::auth::AuthError;
use thiserror::Error;
use tracing::error;

/// Failure returned to HTTP clients as `{"message": ...}`.
///
/// Internal faults carry no detail; it is logged where the conversion happens.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            AuthError::DuplicateEmail => ApiError::BadRequest("Email already exists".into()),
            AuthError::UserNotFound => ApiError::Unauthorized("User not found".into()),
            AuthError::InvalidCredentials => ApiError::Unauthorized("Incorrect password.".into()),
            AuthError::InvalidToken(_) => ApiError::Unauthorized("Invalid or expired token".into()),
            AuthError::Internal(ref detail) => {
                error!(code = e.code(), error = %detail, "internal auth failure");
                ApiError::Internal
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(MessageBody::new(self.to_string()))).into_response()
    }
}
