//! Cross-cutting error types for Threshold.
//!
//! Domain-specific errors (`DatabaseError`, `GateError`) live in their own
//! crates. `thr-cli` converges everything into `anyhow`.

use thiserror::Error;

/// Errors raised while parsing core values from strings.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (unknown enum value, malformed hint).
    #[error("Validation error: {0}")]
    Validation(String),
}
