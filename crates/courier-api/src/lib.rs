pub mod auth;
pub mod error;
pub mod identity;
pub mod messages;
pub mod middleware;
pub mod users;

mod rows;

use std::sync::Arc;

use identity::IdentityService;
use messages::Mailbox;

pub struct AppStateInner {
    pub identity: IdentityService,
    pub mailbox: Mailbox,
}

pub type AppState = Arc<AppStateInner>;

/// Run a hashing or store closure off the async runtime.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, error::ApiError>
where
    F: FnOnce() -> Result<T, error::ApiError> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result,
        Err(e) => Err(error::ApiError::Internal(anyhow::anyhow!(
            "blocking task join failed: {e}"
        ))),
    }
}
