use thiserror::Error;

/// Store failures the callers need to tell apart: a unique-constraint
/// violation surfaces as `Conflict` (register translates it into its
/// own username-taken error), a missing row as `NotFound`. Everything
/// else passes through as the underlying SQLite error.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    Conflict,

    #[error("row not found")]
    NotFound,

    #[error("database lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
