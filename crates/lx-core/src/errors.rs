//! Cross-cutting error types for Lifex.
//!
//! Domain-specific errors (`DatabaseError`, `ConfigError`, `PredictError`) live
//! next to the code that raises them. They converge into `anyhow` in `lxd`.

use thiserror::Error;

/// Errors that can be raised by any Lifex crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (range, format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
