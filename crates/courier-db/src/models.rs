/// Database row types — these map directly to SQLite rows. Timestamps
/// stay as the TEXT the database hands back; the API layer owns parsing.

pub struct UserRow {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub join_at: String,
    pub last_login_at: Option<String>,
}

/// The public columns of a user, as listed or joined onto messages.
pub struct ProfileRow {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// A message joined with the profile of the user on the other side of
/// it: the recipient for `messages_from`, the sender for `messages_to`.
pub struct MessageRow {
    pub id: String,
    pub body: String,
    pub sent_at: String,
    pub read_at: Option<String>,
    pub counterpart: ProfileRow,
}
