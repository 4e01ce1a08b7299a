use std::sync::Arc;

use courier_db::Database;
use courier_types::models::{ReceivedMessage, SentMessage};

use crate::error::ApiError;
use crate::{rows, run_blocking};

/// Read access to a user's sent and received messages, with the
/// counterpart resolved to their public profile. An empty mailbox is a
/// valid empty list, not an error.
#[derive(Clone)]
pub struct Mailbox {
    store: Arc<Database>,
}

impl Mailbox {
    pub fn new(store: Arc<Database>) -> Self {
        Self { store }
    }

    pub async fn sent_by(&self, username: &str) -> Result<Vec<SentMessage>, ApiError> {
        let store = self.store.clone();
        let name = username.to_string();
        let listed = run_blocking(move || store.messages_from(&name).map_err(ApiError::from)).await?;
        Ok(listed.into_iter().map(rows::sent_from_row).collect())
    }

    pub async fn received_by(&self, username: &str) -> Result<Vec<ReceivedMessage>, ApiError> {
        let store = self.store.clone();
        let name = username.to_string();
        let listed = run_blocking(move || store.messages_to(&name).map_err(ApiError::from)).await?;
        Ok(listed.into_iter().map(rows::received_from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn store_with_users() -> Arc<Database> {
        let db = Arc::new(Database::open_in_memory().unwrap());
        db.insert_user("alice", "digest", "Alice", "Ames", "+15550000001")
            .unwrap();
        db.insert_user("bob", "digest", "Bob", "Burns", "+15550000002")
            .unwrap();
        db
    }

    #[tokio::test]
    async fn empty_mailbox_is_empty_list() {
        let mailbox = Mailbox::new(store_with_users());

        assert!(mailbox.sent_by("alice").await.unwrap().is_empty());
        assert!(mailbox.received_by("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sent_and_received_resolve_counterparts() {
        let store = store_with_users();
        let id = Uuid::new_v4();
        store
            .insert_message(&id.to_string(), "alice", "bob", "hi bob")
            .unwrap();

        let mailbox = Mailbox::new(store);

        let sent = mailbox.sent_by("alice").await.unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id, id);
        assert_eq!(sent[0].to_user.username, "bob");
        assert_eq!(sent[0].to_user.first_name, "Bob");
        assert_eq!(sent[0].body, "hi bob");
        assert!(sent[0].read_at.is_none());

        let received = mailbox.received_by("bob").await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].from_user.username, "alice");

        // Neither party sees the message from the other direction.
        assert!(mailbox.received_by("alice").await.unwrap().is_empty());
        assert!(mailbox.sent_by("bob").await.unwrap().is_empty());
    }
}
