use thiserror::Error;

pub type DbResult<T, E = DbError> = Result<T, E>;

/// Site store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The site store could not be opened.
    #[error("cannot connect to site store at {path}: {reason}")]
    Connection { path: String, reason: String },

    /// A record addressed by a fixed identifier does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// The store rejected a write; the transaction was rolled back.
    #[error("write rejected by the site store")]
    Persistence(#[source] rusqlite::Error),

    #[error("migration failed: {0:#}")]
    Migration(anyhow::Error),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
