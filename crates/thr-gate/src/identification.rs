//! Token-scoped identification held after a valid access-link visit.
//!
//! Lightweight stand-in for a session: the bearer token plus the email of the
//! client record it resolved to. Re-validated on every use.

use std::sync::Arc;

use serde::Serialize;

use crate::error::GateError;
use crate::slots::Slots;

pub const TOKEN_KEY: &str = "client_token";
pub const EMAIL_KEY: &str = "client_email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenIdentification {
    pub token: String,
    pub email: String,
}

#[derive(Clone)]
pub struct IdentificationStore {
    slots: Arc<dyn Slots>,
}

impl IdentificationStore {
    #[must_use]
    pub fn new(slots: Arc<dyn Slots>) -> Self {
        Self { slots }
    }

    /// # Errors
    ///
    /// Returns `GateError::HintStore` if the backend rejects the write.
    pub fn hold(&self, identification: &TokenIdentification) -> Result<(), GateError> {
        self.slots.set(TOKEN_KEY, &identification.token)?;
        self.slots.set(EMAIL_KEY, &identification.email)?;
        Ok(())
    }

    /// The held identification. Partial or unreadable state reads as none.
    #[must_use]
    pub fn current(&self) -> Option<TokenIdentification> {
        let read = || -> Result<_, GateError> {
            Ok((self.slots.get(TOKEN_KEY)?, self.slots.get(EMAIL_KEY)?))
        };
        match read() {
            Ok((Some(token), Some(email))) if !token.trim().is_empty() => {
                Some(TokenIdentification { token, email })
            }
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(%error, "identification store unavailable");
                None
            }
        }
    }

    /// # Errors
    ///
    /// Returns `GateError::HintStore` if the backend rejects the removal.
    pub fn forget(&self) -> Result<(), GateError> {
        self.slots.remove(TOKEN_KEY)?;
        self.slots.remove(EMAIL_KEY)?;
        Ok(())
    }
}

impl std::fmt::Debug for IdentificationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentificationStore").finish_non_exhaustive()
    }
}
