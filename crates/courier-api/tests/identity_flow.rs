//! End-to-end flow over an in-memory database: register two users,
//! log in, exchange a message, read both mailboxes.

use std::sync::Arc;

use uuid::Uuid;

use courier_api::error::ApiError;
use courier_api::identity::IdentityService;
use courier_api::messages::Mailbox;
use courier_auth::{HashCost, PasswordHasher, TokenIssuer};
use courier_db::Database;
use courier_types::api::RegisterRequest;

fn services() -> (IdentityService, Mailbox, Arc<Database>) {
    let store = Arc::new(Database::open_in_memory().unwrap());
    let hasher = PasswordHasher::new(HashCost {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap();
    let tokens = TokenIssuer::new("integration-secret", None);

    let identity = IdentityService::new(store.clone(), hasher, tokens);
    let mailbox = Mailbox::new(store.clone());
    (identity, mailbox, store)
}

fn request(username: &str, password: &str, first_name: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        password: password.to_string(),
        first_name: first_name.to_string(),
        last_name: "Example".to_string(),
        phone: "+15550000000".to_string(),
    }
}

#[tokio::test]
async fn register_login_message_roundtrip() {
    let (identity, mailbox, store) = services();

    identity
        .register(request("alice", "secret1", "Alice"))
        .await
        .unwrap();
    identity
        .register(request("bob", "secret2", "Bob"))
        .await
        .unwrap();

    // Fresh accounts have empty mailboxes.
    assert!(mailbox.sent_by("alice").await.unwrap().is_empty());
    assert!(mailbox.received_by("bob").await.unwrap().is_empty());

    let token = identity.login("alice", "secret1").await.unwrap();
    let claims = identity.verify_token(&token).unwrap();
    assert_eq!(claims.username, "alice");

    // No send route exists; the store writes the row directly.
    let id = Uuid::new_v4();
    store
        .insert_message(&id.to_string(), "alice", "bob", "hello bob")
        .unwrap();

    let sent = mailbox.sent_by("alice").await.unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_user.username, "bob");
    assert_eq!(sent[0].body, "hello bob");

    let received = mailbox.received_by("bob").await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].from_user.username, "alice");
    assert_eq!(received[0].id, sent[0].id);
}

#[tokio::test]
async fn duplicate_registration_and_bad_logins() {
    let (identity, _mailbox, _store) = services();

    identity
        .register(request("alice", "secret1", "Alice"))
        .await
        .unwrap();

    let taken = identity
        .register(request("alice", "other", "Imposter"))
        .await
        .unwrap_err();
    assert!(matches!(taken, ApiError::UsernameTaken));

    let bad_password = identity.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(bad_password, ApiError::InvalidCredentials));

    let unknown = identity.login("nobody", "wrong").await.unwrap_err();
    assert!(matches!(unknown, ApiError::InvalidCredentials));

    // A token from one deployment's secret is rejected by another's.
    let other_issuer = TokenIssuer::new("some-other-secret", None);
    let foreign = other_issuer.issue("alice").unwrap();
    assert!(matches!(
        identity.verify_token(&foreign).unwrap_err(),
        ApiError::InvalidToken
    ));
}
