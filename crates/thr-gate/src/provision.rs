//! Client auto-provisioning from public intake forms.
//!
//! Idempotent per `(identity, organization)`: the storage uniqueness index is
//! the arbiter when two provisioning calls race.

use std::sync::Arc;

use serde::Serialize;

use thr_core::entities::{ClientRecord, Identity};
use thr_core::enums::ClientOrigin;

use crate::error::GateError;
use crate::lookup::ClientStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provisioned {
    pub record: ClientRecord,
    /// `false` when an existing record was returned.
    pub created: bool,
}

#[derive(Clone)]
pub struct ClientAutoProvisioner {
    store: Arc<dyn ClientStore>,
}

impl ClientAutoProvisioner {
    #[must_use]
    pub fn new(store: Arc<dyn ClientStore>) -> Self {
        Self { store }
    }

    /// Ensure `identity` holds a live client record in `organization_id`.
    ///
    /// A uniqueness conflict from a concurrent caller is resolved by re-reading
    /// and returning the record that won.
    ///
    /// # Errors
    ///
    /// Returns `GateError::ProvisionFailed` if the organization id is blank,
    /// the insert fails for another reason, or a conflict is reported but no
    /// record can be re-read. Lookup failures propagate unchanged.
    pub async fn provision(
        &self,
        identity: &Identity,
        organization_id: &str,
        form_id: &str,
    ) -> Result<Provisioned, GateError> {
        let organization_id = organization_id.trim();
        if organization_id.is_empty() {
            return Err(GateError::ProvisionFailed("organization id is empty".into()));
        }

        if let Some(record) = self.store.find_client(&identity.id, organization_id).await? {
            tracing::debug!(identity = %identity.id, organization = organization_id, "client record already present");
            return Ok(Provisioned {
                record,
                created: false,
            });
        }

        match self
            .store
            .insert_client(
                identity,
                organization_id,
                ClientOrigin::FormSubmission,
                Some(form_id),
            )
            .await
        {
            Ok(record) => {
                tracing::info!(
                    identity = %identity.id,
                    organization = organization_id,
                    form = form_id,
                    client = %record.id,
                    "client record provisioned"
                );
                Ok(Provisioned {
                    record,
                    created: true,
                })
            }
            Err(GateError::ProvisionConflict { .. }) => {
                tracing::debug!(identity = %identity.id, organization = organization_id, "provision conflict; re-reading");
                let record = self
                    .store
                    .find_client(&identity.id, organization_id)
                    .await?
                    .ok_or_else(|| {
                        GateError::ProvisionFailed(format!(
                            "conflict reported for {} in {organization_id} but no record found",
                            identity.id
                        ))
                    })?;
                Ok(Provisioned {
                    record,
                    created: false,
                })
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for ClientAutoProvisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientAutoProvisioner").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fakes::{FakeDirectory, identity};
    use pretty_assertions::assert_eq;

    fn setup() -> (ClientAutoProvisioner, Arc<FakeDirectory>) {
        let dir = Arc::new(FakeDirectory::new());
        (ClientAutoProvisioner::new(dir.clone()), dir)
    }

    #[tokio::test]
    async fn creates_form_submission_record() {
        let (provisioner, dir) = setup();
        let ana = identity("usr-1", "ana@example.com");

        let provisioned = provisioner.provision(&ana, "org-a", "frm-1").await.unwrap();
        assert!(provisioned.created);
        assert_eq!(provisioned.record.created_from, ClientOrigin::FormSubmission);
        assert_eq!(provisioned.record.source_form_id.as_deref(), Some("frm-1"));
        assert_eq!(provisioned.record.email, "ana@example.com");
        assert_eq!(dir.clients_for("usr-1", "org-a").len(), 1);
    }

    #[tokio::test]
    async fn second_call_returns_the_same_record() {
        let (provisioner, dir) = setup();
        let ana = identity("usr-1", "ana@example.com");

        let first = provisioner.provision(&ana, "org-a", "frm-1").await.unwrap();
        let second = provisioner.provision(&ana, "org-a", "frm-2").await.unwrap();

        assert!(!second.created);
        assert_eq!(second.record.id, first.record.id);
        assert_eq!(dir.clients_for("usr-1", "org-a").len(), 1);
    }

    #[tokio::test]
    async fn conflict_is_recovered_by_re_reading() {
        let (provisioner, dir) = setup();
        FakeDirectory::set_flag(&dir.race_next_insert, true);
        let ana = identity("usr-1", "ana@example.com");

        let provisioned = provisioner.provision(&ana, "org-a", "frm-1").await.unwrap();
        assert!(!provisioned.created);
        assert_eq!(dir.clients_for("usr-1", "org-a"), vec![provisioned.record]);
    }

    #[tokio::test]
    async fn blank_organization_is_rejected() {
        let (provisioner, _) = setup();
        let err = provisioner
            .provision(&identity("usr-1", "a@example.com"), "  ", "frm-1")
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::ProvisionFailed(_)));
    }
}
