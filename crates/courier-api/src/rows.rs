//! Row → API-type conversion. Timestamps and ids come out of SQLite as
//! text; corrupt values degrade to defaults with a warning rather than
//! failing a whole listing.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use courier_db::models::{MessageRow, ProfileRow, UserRow};
use courier_types::models::{Profile, ReceivedMessage, SentMessage, User};

/// SQLite's `datetime('now')` stores "YYYY-MM-DD HH:MM:SS" without a
/// timezone. Try RFC 3339 first, then parse as naive UTC.
pub(crate) fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

fn parse_message_id(raw: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt message id '{}': {}", raw, e);
        Uuid::default()
    })
}

pub(crate) fn profile_from_row(row: ProfileRow) -> Profile {
    Profile {
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
    }
}

pub(crate) fn user_from_row(row: UserRow) -> User {
    User {
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
        phone: row.phone,
        joined_at: parse_timestamp(&row.join_at),
        last_login_at: row.last_login_at.as_deref().map(parse_timestamp),
    }
}

pub(crate) fn sent_from_row(row: MessageRow) -> SentMessage {
    SentMessage {
        id: parse_message_id(&row.id),
        to_user: profile_from_row(row.counterpart),
        body: row.body,
        sent_at: parse_timestamp(&row.sent_at),
        read_at: row.read_at.as_deref().map(parse_timestamp),
    }
}

pub(crate) fn received_from_row(row: MessageRow) -> ReceivedMessage {
    ReceivedMessage {
        id: parse_message_id(&row.id),
        from_user: profile_from_row(row.counterpart),
        body: row.body,
        sent_at: parse_timestamp(&row.sent_at),
        read_at: row.read_at.as_deref().map(parse_timestamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_and_rfc3339_timestamps() {
        let sqlite = parse_timestamp("2026-08-07 12:34:56");
        let rfc = parse_timestamp("2026-08-07T12:34:56Z");

        assert_eq!(sqlite, rfc);
        assert_ne!(sqlite, DateTime::<Utc>::default());
    }

    #[test]
    fn corrupt_timestamp_degrades_to_default() {
        assert_eq!(parse_timestamp("not a time"), DateTime::<Utc>::default());
    }
}
