use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An authenticated account as created by the auth provider on sign-up.
///
/// Immutable from the resolver's point of view; `last_seen_at` is only ever
/// written by the presence recorder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub email_verified: bool,
    /// Role hint from provider metadata (e.g. `"client"` on magic-link invites).
    pub metadata_role: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Case-insensitive email comparison, only true for a verified address.
    #[must_use]
    pub fn has_verified_email(&self, email: &str) -> bool {
        self.email_verified && self.email.trim().eq_ignore_ascii_case(email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(verified: bool) -> Identity {
        Identity {
            id: "usr-1".into(),
            email: "Ana@Example.com".into(),
            email_verified: verified,
            metadata_role: None,
            last_seen_at: None,
        }
    }

    #[test]
    fn verified_email_matches_case_insensitively() {
        assert!(identity(true).has_verified_email("ana@example.com "));
    }

    #[test]
    fn unverified_email_never_matches() {
        assert!(!identity(false).has_verified_email("ana@example.com"));
    }
}
