//! Crate-wide error and result types.

use thiserror::Error;

/// Result alias used throughout Quarterdeck
pub type Result<T> = std::result::Result<T, QuarterdeckError>;

/// Top-level error type for Quarterdeck
#[derive(Debug, Error)]
pub enum QuarterdeckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
