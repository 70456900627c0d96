//! Bearer access-link entry point.
//!
//! A token visit never consults staff data and never produces `SelectRole`:
//! the only destinations are the record's own portal or a login reason.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use thr_core::entities::{ClientRecord, Destination, TokenState};

use crate::error::GateError;
use crate::gate::{GateOutcome, Notice};
use crate::identification::{IdentificationStore, TokenIdentification};
use crate::lookup::TokenLookup;

#[derive(Clone)]
pub struct ClientTokenResolver {
    tokens: Arc<dyn TokenLookup>,
    identification: IdentificationStore,
}

impl ClientTokenResolver {
    #[must_use]
    pub fn new(tokens: Arc<dyn TokenLookup>, identification: IdentificationStore) -> Self {
        Self {
            tokens,
            identification,
        }
    }

    pub async fn visit(&self, token: &str) -> GateOutcome {
        self.visit_at(token, Utc::now()).await
    }

    /// Resolve a token-link visit at `now`.
    ///
    /// Valid tokens replace the held identification. Any failure clears it.
    pub async fn visit_at(&self, token: &str, now: DateTime<Utc>) -> GateOutcome {
        match self.classify(token, now).await {
            Ok(record) => {
                let held = TokenIdentification {
                    token: token.trim().to_string(),
                    email: record.email.clone(),
                };
                if let Err(error) = self.identification.hold(&held) {
                    tracing::warn!(%error, "failed to store token identification");
                }
                tracing::info!(client = %record.id, organization = %record.organization_id, "token link accepted");
                GateOutcome::new(Destination::client(record.organization_id))
            }
            Err(error) => {
                self.forget();
                let reason = error.login_reason();
                tracing::info!(%error, %reason, "token link rejected");
                GateOutcome::with_notice(Destination::login(reason), Notice::error(error.to_string()))
            }
        }
    }

    /// Re-validate the held identification.
    ///
    /// Returns the identification and its record while the token still
    /// resolves and has not expired. A held token that no longer validates is
    /// forgotten.
    pub async fn current_identification(&self) -> Option<(TokenIdentification, ClientRecord)> {
        self.current_identification_at(Utc::now()).await
    }

    pub async fn current_identification_at(
        &self,
        now: DateTime<Utc>,
    ) -> Option<(TokenIdentification, ClientRecord)> {
        let held = self.identification.current()?;
        match self.classify(&held.token, now).await {
            Ok(record) => Some((held, record)),
            Err(GateError::LookupFailed(error)) => {
                // Transient: keep the identification for the next attempt.
                tracing::warn!(%error, "could not re-validate token identification");
                None
            }
            Err(error) => {
                tracing::debug!(%error, "held token no longer valid");
                self.forget();
                None
            }
        }
    }

    pub fn forget(&self) {
        if let Err(error) = self.identification.forget() {
            tracing::warn!(%error, "failed to clear token identification");
        }
    }

    async fn classify(&self, token: &str, now: DateTime<Utc>) -> Result<ClientRecord, GateError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(GateError::TokenNotFound);
        }
        let record = self
            .tokens
            .resolve_token(token)
            .await?
            .filter(|r| !r.is_deleted())
            .ok_or(GateError::TokenNotFound)?;

        match (record.token_state_at(now), record.access_token_expires_at) {
            (TokenState::Expired, Some(expired_at)) => Err(GateError::TokenExpired { expired_at }),
            _ => Ok(record),
        }
    }
}

impl std::fmt::Debug for ClientTokenResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientTokenResolver").finish_non_exhaustive()
    }
}
