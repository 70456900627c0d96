use chrono::{DateTime, Utc};
use thiserror::Error;

use thr_core::enums::LoginReason;

#[derive(Debug, Error)]
pub enum GateError {
    /// Membership, client-record, or token read failed.
    #[error("lookup failed: {0}")]
    LookupFailed(String),

    #[error("access link not recognised")]
    TokenNotFound,

    #[error("access link expired at {expired_at}")]
    TokenExpired { expired_at: DateTime<Utc> },

    /// Storage rejected an insert on the live `(identity, organization)` index.
    #[error("client record already exists for {identity_id} in {organization_id}")]
    ProvisionConflict {
        identity_id: String,
        organization_id: String,
    },

    #[error("provisioning failed: {0}")]
    ProvisionFailed(String),

    #[error("hint store error: {0}")]
    HintStore(String),
}

impl GateError {
    /// Reason code a failed resolution lands on.
    #[must_use]
    pub const fn login_reason(&self) -> LoginReason {
        match self {
            Self::TokenNotFound => LoginReason::InvalidLink,
            Self::TokenExpired { .. } => LoginReason::ExpiredLink,
            Self::LookupFailed(_)
            | Self::ProvisionConflict { .. }
            | Self::ProvisionFailed(_)
            | Self::HintStore(_) => LoginReason::LookupError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_map_to_link_reasons() {
        assert_eq!(GateError::TokenNotFound.login_reason(), LoginReason::InvalidLink);
        let expired = GateError::TokenExpired {
            expired_at: Utc::now(),
        };
        assert_eq!(expired.login_reason(), LoginReason::ExpiredLink);
        assert!(expired.login_reason().offers_new_link());
    }

    #[test]
    fn lookup_failure_maps_to_lookup_error() {
        let err = GateError::LookupFailed("connection reset".into());
        assert_eq!(err.login_reason(), LoginReason::LookupError);
        assert_eq!(err.to_string(), "lookup failed: connection reset");
    }
}
