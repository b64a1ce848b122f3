//! Tally Core - Shared primitives and error types
//!
//! This crate is the dependency root - it has zero internal dependencies.
//! All other crates depend on this one.

use thiserror::Error;

pub mod config;

pub use config::{DisplayConfig, ExportConfig, ExportFormat, LedgerConfig};

/// Global error type for tally
#[derive(Error, Debug)]
pub enum TallyError {
    // === Input Errors ===
    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    // === Cryptography Errors ===
    #[error("Digest primitive unavailable: {0}")]
    DigestUnavailable(String),

    // === I/O Errors ===
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Parsing Errors ===
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    // === Generic Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Rejected caller input for an append.
///
/// The ledger is untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("sender must not be empty")]
    EmptySender,

    #[error("receiver must not be empty")]
    EmptyReceiver,

    #[error("amount must not be empty")]
    EmptyAmount,

    #[error("amount must be a valid number, got {input:?}")]
    InvalidAmount { input: String },

    #[error("amount must be finite, got {input:?}")]
    NonFiniteAmount { input: String },
}

/// Convenience Result type using TallyError
pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_converts() {
        let err: TallyError = ValidationError::EmptySender.into();
        assert!(matches!(err, TallyError::Validation(ValidationError::EmptySender)));
        assert_eq!(err.to_string(), "Invalid transaction: sender must not be empty");
    }

    #[test]
    fn test_invalid_amount_message_quotes_input() {
        let err = ValidationError::InvalidAmount { input: "abc".to_string() };
        assert_eq!(err.to_string(), "amount must be a valid number, got \"abc\"");
    }
}
