use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use courier_db::StoreError;

/// Domain errors. None are recovered inside the services — they ride up
/// to the handlers unchanged and map to a status + `{"error": ...}`
/// body here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("username and password required")]
    MissingCredentials,

    #[error("Username taken. Please pick another!")]
    UsernameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid username/password")]
    InvalidCredentials,

    #[error("invalid or missing token")]
    InvalidToken,

    #[error("cannot access another user's messages")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials
            | ApiError::UsernameTaken
            | ApiError::InvalidCredentials => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // The store reports a duplicate username as a constraint
            // conflict; callers see the domain error, never the raw
            // SQLite failure.
            StoreError::Conflict => ApiError::UsernameTaken,
            StoreError::NotFound => ApiError::UserNotFound,
            other => ApiError::Internal(other.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(err) => {
                error!("internal error: {err:#}");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
