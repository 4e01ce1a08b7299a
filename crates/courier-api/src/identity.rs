use std::sync::Arc;

use courier_auth::{PasswordHasher, TokenIssuer};
use courier_db::Database;
use courier_types::api::{Claims, RegisterRequest};
use courier_types::models::{Profile, User};

use crate::error::ApiError;
use crate::{rows, run_blocking};

/// Registration, login and profile lookups, composed from the injected
/// store, hasher and token issuer. Clones share the collaborators, so
/// the blocking closures can own a handle.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<Database>,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenIssuer>,
}

impl IdentityService {
    pub fn new(store: Arc<Database>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            store,
            hasher: Arc::new(hasher),
            tokens: Arc::new(tokens),
        }
    }

    /// Create the user and log them in: returns a session token bound
    /// to the new username.
    pub async fn register(&self, req: RegisterRequest) -> Result<String, ApiError> {
        if req.username.is_empty() || req.password.is_empty() {
            return Err(ApiError::MissingCredentials);
        }

        let store = self.store.clone();
        let hasher = self.hasher.clone();
        let row = run_blocking(move || {
            let digest = hasher.hash(&req.password)?;
            store
                .insert_user(
                    &req.username,
                    &digest,
                    &req.first_name,
                    &req.last_name,
                    &req.phone,
                )
                .map_err(ApiError::from)
        })
        .await?;

        Ok(self.tokens.issue(&row.username)?)
    }

    /// Is this username/password pair valid? Distinguishes an unknown
    /// username (UserNotFound) from a failed check (Ok(false)); `login`
    /// collapses the two before anything reaches a caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<bool, ApiError> {
        if username.is_empty() || password.is_empty() {
            return Err(ApiError::MissingCredentials);
        }

        let store = self.store.clone();
        let hasher = self.hasher.clone();
        let username = username.to_string();
        let password = password.to_string();
        run_blocking(move || {
            let row = store.find_user(&username)?.ok_or(ApiError::UserNotFound)?;
            Ok(hasher.verify(&password, &row.password))
        })
        .await
    }

    /// Authenticate and mint a session token. The last-login stamp is
    /// written before the token is issued, so the recorded login never
    /// postdates the token it produced.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        match self.authenticate(username, password).await {
            Ok(true) => {}
            // An unknown username and a wrong password are
            // indistinguishable to the caller.
            Ok(false) | Err(ApiError::UserNotFound) => return Err(ApiError::InvalidCredentials),
            Err(e) => return Err(e),
        }

        let store = self.store.clone();
        let name = username.to_string();
        run_blocking(move || store.update_last_login(&name).map_err(ApiError::from)).await?;

        Ok(self.tokens.issue(username)?)
    }

    pub async fn get_profile(&self, username: &str) -> Result<User, ApiError> {
        let store = self.store.clone();
        let name = username.to_string();
        let row =
            run_blocking(move || store.find_user(&name)?.ok_or(ApiError::UserNotFound)).await?;
        Ok(rows::user_from_row(row))
    }

    pub async fn list_all(&self) -> Result<Vec<Profile>, ApiError> {
        let store = self.store.clone();
        let listed = run_blocking(move || store.list_users().map_err(ApiError::from)).await?;
        Ok(listed.into_iter().map(rows::profile_from_row).collect())
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        self.tokens.verify(token).map_err(|_| ApiError::InvalidToken)
    }
}
