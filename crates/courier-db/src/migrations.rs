use crate::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            username       TEXT PRIMARY KEY,
            password       TEXT NOT NULL,
            first_name     TEXT NOT NULL,
            last_name      TEXT NOT NULL,
            phone          TEXT NOT NULL,
            join_at        TEXT NOT NULL DEFAULT (datetime('now')),
            last_login_at  TEXT
        );

        CREATE TABLE IF NOT EXISTS messages (
            id             TEXT PRIMARY KEY,
            from_username  TEXT NOT NULL REFERENCES users(username),
            to_username    TEXT NOT NULL REFERENCES users(username),
            body           TEXT NOT NULL,
            sent_at        TEXT NOT NULL DEFAULT (datetime('now')),
            read_at        TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_messages_from
            ON messages(from_username, sent_at);

        CREATE INDEX IF NOT EXISTS idx_messages_to
            ON messages(to_username, sent_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
