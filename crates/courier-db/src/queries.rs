use crate::Database;
use crate::error::{Result, StoreError};
use crate::models::{MessageRow, ProfileRow, UserRow};
use rusqlite::{Connection, OptionalExtension};

impl Database {
    // -- Users --

    /// Insert a new user row. Uniqueness is enforced here by the
    /// primary key, atomically — a duplicate username comes back as
    /// `StoreError::Conflict` and leaves the table untouched.
    pub fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
        phone: &str,
    ) -> Result<UserRow> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, password, first_name, last_name, phone)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (username, password_hash, first_name, last_name, phone),
            );
            match inserted {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => return Err(StoreError::Conflict),
                Err(e) => return Err(e.into()),
            }
            query_user(conn, username)?.ok_or(StoreError::NotFound)
        })
    }

    pub fn find_user(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, username))
    }

    /// Stamp the user's last login time. `NotFound` when no such row.
    pub fn update_last_login(&self, username: &str) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET last_login_at = datetime('now') WHERE username = ?1",
                [username],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    /// Public columns of every user, ordered by username so listings
    /// are stable across runs.
    pub fn list_users(&self) -> Result<Vec<ProfileRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, first_name, last_name, phone
                 FROM users ORDER BY username",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(ProfileRow {
                        username: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        phone: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        id: &str,
        from_username: &str,
        to_username: &str,
        body: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, from_username, to_username, body)
                 VALUES (?1, ?2, ?3, ?4)",
                (id, from_username, to_username, body),
            )?;
            Ok(())
        })
    }

    /// Messages sent by `username`, each joined with the recipient's
    /// public profile.
    pub fn messages_from(&self, username: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                "SELECT m.id, m.body, m.sent_at, m.read_at,
                        u.username, u.first_name, u.last_name, u.phone
                 FROM messages m
                 JOIN users u ON u.username = m.to_username
                 WHERE m.from_username = ?1
                 ORDER BY m.sent_at, m.id",
                username,
            )
        })
    }

    /// Messages received by `username`, each joined with the sender's
    /// public profile.
    pub fn messages_to(&self, username: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            query_messages(
                conn,
                "SELECT m.id, m.body, m.sent_at, m.read_at,
                        u.username, u.first_name, u.last_name, u.phone
                 FROM messages m
                 JOIN users u ON u.username = m.from_username
                 WHERE m.to_username = ?1
                 ORDER BY m.sent_at, m.id",
                username,
            )
        })
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn query_user(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT username, password, first_name, last_name, phone, join_at, last_login_at
         FROM users WHERE username = ?1",
    )?;

    let row = stmt
        .query_row([username], |row| {
            Ok(UserRow {
                username: row.get(0)?,
                password: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                phone: row.get(4)?,
                join_at: row.get(5)?,
                last_login_at: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_messages(conn: &Connection, sql: &str, username: &str) -> Result<Vec<MessageRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([username], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                body: row.get(1)?,
                sent_at: row.get(2)?,
                read_at: row.get(3)?,
                counterpart: ProfileRow {
                    username: row.get(4)?,
                    first_name: row.get(5)?,
                    last_name: row.get(6)?,
                    phone: row.get(7)?,
                },
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
