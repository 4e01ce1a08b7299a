use axum::{
    Extension, Json,
    extract::{Path, State},
};

use courier_types::api::Claims;
use courier_types::models::{Profile, ReceivedMessage, SentMessage, User};

use crate::AppState;
use crate::error::ApiError;

/// GET /users — public info on every user.
pub async fn list(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<Profile>>, ApiError> {
    Ok(Json(state.identity.list_all().await?))
}

/// GET /users/{username} — full profile of one user.
pub async fn get(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.identity.get_profile(&username).await?))
}

/// GET /users/{username}/messages/from — messages this user sent.
pub async fn messages_from(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<SentMessage>>, ApiError> {
    require_self(&claims, &username)?;
    Ok(Json(state.mailbox.sent_by(&username).await?))
}

/// GET /users/{username}/messages/to — messages this user received.
pub async fn messages_to(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<ReceivedMessage>>, ApiError> {
    require_self(&claims, &username)?;
    Ok(Json(state.mailbox.received_by(&username).await?))
}

/// A token only grants access to its own user's mailbox.
fn require_self(claims: &Claims, username: &str) -> Result<(), ApiError> {
    if claims.username != username {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(username: &str) -> Claims {
        Claims {
            username: username.to_string(),
            iat: 0,
            exp: None,
        }
    }

    #[test]
    fn mailbox_access_is_bound_to_the_token_identity() {
        assert!(require_self(&claims("alice"), "alice").is_ok());

        let err = require_self(&claims("alice"), "bob").unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }
}
