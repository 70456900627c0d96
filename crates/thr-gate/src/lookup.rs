//! Storage seams the gate reads and writes through.
//!
//! Every method classifies its own failures into `GateError`, so the gate
//! never sees a storage-specific error type. `adapters` implements all of
//! them for `thr_db::service::AccessService`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use thr_core::entities::{ClientRecord, Identity, StaffMembership};
use thr_core::enums::ClientOrigin;

use crate::error::GateError;

/// Read-only view of an identity's staff and client relationships.
#[async_trait]
pub trait MembershipLookup: Send + Sync {
    /// Live staff memberships for the identity.
    async fn staff_memberships(&self, identity_id: &str)
    -> Result<Vec<StaffMembership>, GateError>;

    /// Live (not soft-deleted) client records linked to the identity.
    async fn client_records(&self, identity_id: &str) -> Result<Vec<ClientRecord>, GateError>;
}

/// Bearer access-token resolution, independent of any session.
#[async_trait]
pub trait TokenLookup: Send + Sync {
    /// The record holding this token, expired or not. `None` when unknown.
    async fn resolve_token(&self, token: &str) -> Result<Option<ClientRecord>, GateError>;
}

#[async_trait]
pub trait PresenceRecorder: Send + Sync {
    async fn touch_last_seen(&self, identity_id: &str, at: DateTime<Utc>)
    -> Result<(), GateError>;
}

/// Write surface over client records used by provisioning and token linking.
#[async_trait]
pub trait ClientStore: Send + Sync {
    async fn find_client(
        &self,
        identity_id: &str,
        organization_id: &str,
    ) -> Result<Option<ClientRecord>, GateError>;

    /// Insert a live record for `(identity, organization)`.
    ///
    /// Must return `GateError::ProvisionConflict` when storage reports the pair
    /// already exists.
    async fn insert_client(
        &self,
        identity: &Identity,
        organization_id: &str,
        origin: ClientOrigin,
        source_form_id: Option<&str>,
    ) -> Result<ClientRecord, GateError>;

    /// Attach an identity to a token-only record.
    async fn link_client_identity(
        &self,
        client_id: &str,
        identity_id: &str,
    ) -> Result<ClientRecord, GateError>;
}
