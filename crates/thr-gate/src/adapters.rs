//! Storage seams implemented over `thr_db::service::AccessService`.
//!
//! `DatabaseError` never crosses into the gate. Reads map to `LookupFailed`.
//! A uniqueness violation on insert or link maps to `ProvisionConflict`; any
//! other write failure maps to `ProvisionFailed`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use thr_core::entities::{ClientRecord, Identity, StaffMembership};
use thr_core::enums::ClientOrigin;
use thr_db::error::DatabaseError;
use thr_db::repos::client::NewClientRecord;
use thr_db::service::AccessService;

use crate::error::GateError;
use crate::lookup::{ClientStore, MembershipLookup, PresenceRecorder, TokenLookup};

#[allow(clippy::needless_pass_by_value)]
fn lookup_failed(e: DatabaseError) -> GateError {
    GateError::LookupFailed(e.to_string())
}

fn write_failed(e: &DatabaseError, identity_id: &str, organization_id: &str) -> GateError {
    if e.is_unique_violation() {
        GateError::ProvisionConflict {
            identity_id: identity_id.to_string(),
            organization_id: organization_id.to_string(),
        }
    } else {
        GateError::ProvisionFailed(e.to_string())
    }
}

#[async_trait]
impl MembershipLookup for AccessService {
    async fn staff_memberships(
        &self,
        identity_id: &str,
    ) -> Result<Vec<StaffMembership>, GateError> {
        self.list_staff_memberships(identity_id)
            .await
            .map_err(lookup_failed)
    }

    async fn client_records(&self, identity_id: &str) -> Result<Vec<ClientRecord>, GateError> {
        self.list_client_records(identity_id)
            .await
            .map_err(lookup_failed)
    }
}

#[async_trait]
impl TokenLookup for AccessService {
    async fn resolve_token(&self, token: &str) -> Result<Option<ClientRecord>, GateError> {
        self.find_client_by_token(token).await.map_err(lookup_failed)
    }
}

#[async_trait]
impl PresenceRecorder for AccessService {
    async fn touch_last_seen(&self, identity_id: &str, at: DateTime<Utc>) -> Result<(), GateError> {
        Self::touch_last_seen(self, identity_id, at)
            .await
            .map_err(lookup_failed)
    }
}

#[async_trait]
impl ClientStore for AccessService {
    async fn find_client(
        &self,
        identity_id: &str,
        organization_id: &str,
    ) -> Result<Option<ClientRecord>, GateError> {
        Self::find_client(self, identity_id, organization_id)
            .await
            .map_err(lookup_failed)
    }

    async fn insert_client(
        &self,
        identity: &Identity,
        organization_id: &str,
        origin: ClientOrigin,
        source_form_id: Option<&str>,
    ) -> Result<ClientRecord, GateError> {
        let new = NewClientRecord {
            identity_id: Some(identity.id.clone()),
            organization_id: organization_id.to_string(),
            email: identity.email.clone(),
            created_from: origin,
            source_form_id: source_form_id.map(str::to_string),
        };
        Self::insert_client(self, &new)
            .await
            .map_err(|e| write_failed(&e, &identity.id, organization_id))
    }

    async fn link_client_identity(
        &self,
        client_id: &str,
        identity_id: &str,
    ) -> Result<ClientRecord, GateError> {
        match Self::link_client_identity(self, client_id, identity_id).await {
            Ok(record) => Ok(record),
            Err(e) if e.is_unique_violation() => {
                let organization_id = Self::get_client(self, client_id)
                    .await
                    .map(|r| r.organization_id)
                    .unwrap_or_default();
                Err(write_failed(&e, identity_id, &organization_id))
            }
            Err(e) => Err(GateError::ProvisionFailed(e.to_string())),
        }
    }
}
