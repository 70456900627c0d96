use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ClientOrigin;

/// An identity's (or a bearer token's) access to one organization's client portal.
///
/// `identity_id` is `None` for token-only access that has not been linked to
/// an account yet.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ClientRecord {
    pub id: String,
    pub identity_id: Option<String>,
    pub organization_id: String,
    pub email: String,
    pub access_token: Option<String>,
    pub access_token_expires_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_from: ClientOrigin,
    /// Intake form that provisioned the record, for `FormSubmission` origins.
    pub source_form_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Expiry classification of a client access token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Valid,
    Expired,
}

impl ClientRecord {
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    #[must_use]
    pub const fn is_linked(&self) -> bool {
        self.identity_id.is_some()
    }

    /// Classify the access token at `now`.
    ///
    /// A token with no expiry never expires. Expiry is strict: a token whose
    /// `expires_at` equals `now` is still valid.
    #[must_use]
    pub fn token_state_at(&self, now: DateTime<Utc>) -> TokenState {
        match self.access_token_expires_at {
            Some(expires_at) if expires_at < now => TokenState::Expired,
            _ => TokenState::Valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn record(expires_at: Option<DateTime<Utc>>) -> ClientRecord {
        ClientRecord {
            id: "cli-1".into(),
            identity_id: None,
            organization_id: "org-a".into(),
            email: "c@example.com".into(),
            access_token: Some("tok".into()),
            access_token_expires_at: expires_at,
            deleted_at: None,
            created_from: ClientOrigin::Invitation,
            source_form_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn one_second_past_is_expired() {
        let now = Utc::now();
        let rec = record(Some(now - TimeDelta::seconds(1)));
        assert_eq!(rec.token_state_at(now), TokenState::Expired);
    }

    #[test]
    fn one_second_ahead_is_valid() {
        let now = Utc::now();
        let rec = record(Some(now + TimeDelta::seconds(1)));
        assert_eq!(rec.token_state_at(now), TokenState::Valid);
    }

    #[test]
    fn exact_instant_is_valid() {
        let now = Utc::now();
        assert_eq!(record(Some(now)).token_state_at(now), TokenState::Valid);
    }

    #[test]
    fn no_expiry_is_valid() {
        assert_eq!(record(None).token_state_at(Utc::now()), TokenState::Valid);
    }
}
