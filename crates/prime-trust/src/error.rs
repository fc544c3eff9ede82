//! Prime Trust Error Types
//!
//! Errors raised by the service layer around the calculator: loading
//! metrics, persisting snapshots, configuration and requirement checks.
//! The calculator itself never fails.

use prime_trust_core::ParseLabelError;
use serde::{Deserialize, Serialize};

/// Result type alias for Prime Trust operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Prime Trust Error Types
///
/// Serializable as `{"type": ..., "message": ...}` so they can be handed to
/// a front end unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "type", content = "message")]
pub enum Error {
    /// Storage/database operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Member not found
    #[error("Member not found: {0}")]
    MemberNotFound(String),

    /// Invalid input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Trust score too low for operation
    #[error("Insufficient trust: {0}")]
    InsufficientTrust(String),

    /// Internal error (unexpected condition)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a storage error with context
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Create a config error with context
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this error is recoverable
    ///
    /// Storage hiccups (locked database, full disk) can be retried; the rest
    /// need different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Get the error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Error::Storage(_) => "TRUST_STORAGE",
            Error::MemberNotFound(_) => "TRUST_MEMBER_NOT_FOUND",
            Error::InvalidInput(_) => "TRUST_INVALID_INPUT",
            Error::Config(_) => "TRUST_CONFIG",
            Error::Serialization(_) => "TRUST_SERIALIZATION",
            Error::InsufficientTrust(_) => "TRUST_INSUFFICIENT",
            Error::Internal(_) => "TRUST_INTERNAL",
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<ParseLabelError> for Error {
    fn from(e: ParseLabelError) -> Self {
        Error::InvalidInput(e.to_string())
    }
}
