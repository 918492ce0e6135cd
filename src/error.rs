//! Crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("{0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Store lock poisoned")]
    LockPoisoned,
}

impl PosError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PosError::Validation(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        PosError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<figment::Error> for PosError {
    fn from(e: figment::Error) -> Self {
        PosError::Config(Box::new(e))
    }
}

pub type Result<T> = std::result::Result<T, PosError>;
