//! Authentication events: the explicit trigger for one resolution.

use std::fmt;

use serde::Serialize;

use thr_core::entities::{Hint, Identity};
use thr_core::enums::AuthEventKind;

/// Error reported by the auth provider on the callback URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderError {
    pub code: String,
    pub description: Option<String>,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{description} ({})", self.code),
            None => f.write_str(&self.code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    /// Authenticated identity, `None` when the provider has no session.
    pub identity: Option<Identity>,
    /// Provider `type` flag (`"recovery"`, `"signup"`, `"magiclink"`, ...).
    pub type_flag: Option<String>,
    /// Access token carried by a password-recovery link.
    pub recovery_token: Option<String>,
    pub url_hint: Option<Hint>,
    pub provider_error: Option<ProviderError>,
}

impl AuthEvent {
    #[must_use]
    pub const fn new(kind: AuthEventKind) -> Self {
        Self {
            kind,
            identity: None,
            type_flag: None,
            recovery_token: None,
            url_hint: None,
            provider_error: None,
        }
    }

    #[must_use]
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    #[must_use]
    pub fn with_url_hint(mut self, hint: Hint) -> Self {
        self.url_hint = Some(hint);
        self
    }

    #[must_use]
    pub fn with_type_flag(mut self, flag: impl Into<String>) -> Self {
        self.type_flag = Some(flag.into());
        self
    }

    /// Parse the query (or fragment) of an auth callback URL.
    ///
    /// Recognised keys: `type`, `access_token`, `error`, `error_description`,
    /// `context`, `orgId`. Values are percent-decoded; `+` decodes to a space.
    /// Unknown keys are ignored.
    #[must_use]
    pub fn from_callback_query(kind: AuthEventKind, query: &str) -> Self {
        let mut event = Self::new(kind);
        let mut context = None;
        let mut org_id = None;
        let mut error_code = None;
        let mut error_description = None;

        let query = query.trim().trim_start_matches(['?', '#']);
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(raw);
            if value.is_empty() {
                continue;
            }
            match key {
                "type" => event.type_flag = Some(value),
                "access_token" => event.recovery_token = Some(value),
                "error" => error_code = Some(value),
                "error_description" => error_description = Some(value),
                "context" => context = Some(value),
                "orgId" => org_id = Some(value),
                _ => {}
            }
        }

        event.url_hint = Hint::from_parts(context.as_deref(), org_id.as_deref());
        event.provider_error = match (error_code, error_description) {
            (Some(code), description) => Some(ProviderError { code, description }),
            (None, Some(description)) => Some(ProviderError {
                code: "unknown_error".into(),
                description: Some(description),
            }),
            (None, None) => None,
        };
        event
    }

    /// Whether this event is a password-recovery callback.
    #[must_use]
    pub fn is_recovery(&self) -> bool {
        self.type_flag.as_deref() == Some("recovery")
            || self.recovery_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.trim().to_string(),
        Err(error) => {
            tracing::debug!(%error, "undecodable callback value kept verbatim");
            spaced.trim().to_string()
        }
    }
}
