use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use courier_api::identity::IdentityService;
use courier_api::messages::Mailbox;
use courier_api::middleware::require_auth;
use courier_api::{AppState, AppStateInner, auth, users};
use courier_auth::{PasswordHasher, TokenIssuer};
use courier_db::Database;

mod config;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Init database and services
    let db = Arc::new(Database::open(&config.db_path)?);
    let hasher = PasswordHasher::new(config.hash_cost)?;
    let tokens = TokenIssuer::new(&config.secret_key, config.token_ttl);

    let state: AppState = Arc::new(AppStateInner {
        identity: IdentityService::new(db.clone(), hasher, tokens),
        mailbox: Mailbox::new(db),
    });

    // Routes
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/users", get(users::list))
        .route("/users/{username}", get(users::get))
        .route("/users/{username}/messages/from", get(users::messages_from))
        .route("/users/{username}/messages/to", get(users::messages_to))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Courier server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
