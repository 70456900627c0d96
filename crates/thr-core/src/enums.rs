//! Role, context, reason, and event enums for Threshold.
//!
//! Storage enums use `snake_case` serialization. Wire-facing enums that end up
//! in URLs (`HintContext`, `LoginReason`, `AuthEventKind`) use `kebab-case`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// StaffRole
// ---------------------------------------------------------------------------

/// Role an identity holds inside an organization workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Owner,
    Admin,
    Member,
}

impl StaffRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            other => Err(CoreError::Validation(format!("unknown staff role '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// HintContext
// ---------------------------------------------------------------------------

/// Which side of the product a hint (or a role choice) points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum HintContext {
    Agency,
    Client,
}

impl HintContext {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agency => "agency",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for HintContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HintContext {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agency" => Ok(Self::Agency),
            "client" => Ok(Self::Client),
            other => Err(CoreError::Validation(format!("unknown hint context '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// LoginReason
// ---------------------------------------------------------------------------

/// Reason code attached to a `Login` destination so the login screen can
/// explain why the user landed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum LoginReason {
    /// Membership or client-record lookup failed.
    LookupError,
    /// Token link did not resolve to a client record.
    InvalidLink,
    /// Token link resolved but its access token has expired.
    ExpiredLink,
    /// The auth event carried no authenticated identity.
    NoSession,
    /// The auth provider reported an error on the callback.
    ProviderError,
}

impl LoginReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LookupError => "lookup-error",
            Self::InvalidLink => "invalid-link",
            Self::ExpiredLink => "expired-link",
            Self::NoSession => "no-session",
            Self::ProviderError => "provider-error",
        }
    }

    /// Whether the login screen should offer "request a new link".
    #[must_use]
    pub const fn offers_new_link(self) -> bool {
        matches!(self, Self::InvalidLink | Self::ExpiredLink)
    }
}

impl fmt::Display for LoginReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuthEventKind
// ---------------------------------------------------------------------------

/// Which auth-provider call preceded a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AuthEventKind {
    SignIn,
    SignUp,
    MagicLinkCallback,
    OauthCallback,
    PasswordResetCompleted,
    InitialSession,
}

impl AuthEventKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign-in",
            Self::SignUp => "sign-up",
            Self::MagicLinkCallback => "magic-link-callback",
            Self::OauthCallback => "oauth-callback",
            Self::PasswordResetCompleted => "password-reset-completed",
            Self::InitialSession => "initial-session",
        }
    }
}

impl fmt::Display for AuthEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthEventKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign-in" => Ok(Self::SignIn),
            "sign-up" => Ok(Self::SignUp),
            "magic-link-callback" => Ok(Self::MagicLinkCallback),
            "oauth-callback" => Ok(Self::OauthCallback),
            "password-reset-completed" => Ok(Self::PasswordResetCompleted),
            "initial-session" => Ok(Self::InitialSession),
            other => Err(CoreError::Validation(format!("unknown auth event '{other}'"))),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientOrigin
// ---------------------------------------------------------------------------

/// How a client record came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ClientOrigin {
    Invitation,
    FormSubmission,
    Import,
}

impl ClientOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invitation => "invitation",
            Self::FormSubmission => "form_submission",
            Self::Import => "import",
        }
    }
}

impl fmt::Display for ClientOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientOrigin {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invitation" => Ok(Self::Invitation),
            "form_submission" => Ok(Self::FormSubmission),
            "import" => Ok(Self::Import),
            other => Err(CoreError::Validation(format!("unknown client origin '{other}'"))),
        }
    }
}
