use axum::{Json, extract::State};

use courier_types::api::{LoginRequest, RegisterRequest, TokenResponse};

use crate::AppState;
use crate::error::ApiError;

/// POST /auth/register — create the user and return a session token.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.identity.register(req).await?;
    Ok(Json(TokenResponse { token }))
}

/// POST /auth/login — verify credentials, stamp the login, return a
/// session token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.identity.login(&req.username, &req.password).await?;
    Ok(Json(TokenResponse { token }))
}
