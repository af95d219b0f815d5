//! Error types for the sub-letting manager backend.

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    LockPoisoned,

    #[error("Upload error: {0}")]
    Upload(String),
}

pub type AppResult<T> = Result<T, AppError>;
