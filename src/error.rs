use thiserror::Error;

/// Failures surfaced by a [`crate::db::Store`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error("invalid id: {0}")]
    InvalidId(String),
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A user-facing form validation failure. The message is shown as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

impl ValidationError {
    pub fn message(&self) -> &'static str {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("invalid Authorization header format")]
    MalformedHeader,
    #[error("token rejected: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}
