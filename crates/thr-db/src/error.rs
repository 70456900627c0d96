//! Database error types for thr-db.

use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., linking an already linked record).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    /// Whether this error is a UNIQUE constraint (or unique index) violation.
    ///
    /// libSQL surfaces constraint failures as message text only, so this
    /// matches on the `SQLite` message.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::LibSql(e) => is_unique_message(&e.to_string()),
            Self::Query(msg) => is_unique_message(msg),
            _ => false,
        }
    }
}

fn is_unique_message(msg: &str) -> bool {
    msg.contains("UNIQUE constraint failed")
}
